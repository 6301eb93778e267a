pub mod build;
pub mod config;
pub mod serve;
pub mod update;
