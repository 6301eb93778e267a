//! The united FLARM device database.
//!
//! Combines the OGN device database, FlarmNet and WeGlide into one set of records and writes
//! it as XCSoar and LX FlarmNet files plus JSON.

pub mod cache;
pub mod error;
pub mod fln;
pub mod merge;
pub mod record;
pub mod sanitize;
pub mod sources;
pub mod update;

pub use error::DataError;
pub use record::{File, Record};
pub use sources::{Client, SourceUrls};
pub use update::{update, write_outputs, UpdateConfig, UpdateResult};
