//! united-web - assembles the united FLARM database download page.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "united-web")]
#[command(about = "Builds the united FLARM database and its download page")]
#[command(version)]
pub struct Cli {
    /// Defaults to `build` when omitted
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to webpage.toml config file (optional)
    #[arg(short, long, default_value = "webpage.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset the output directory, copy assets and render the page
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download the source databases and write the united files
    Update {
        /// Directory for united.fln, united-lx.fln and united.json
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Directory for cached downloads
        #[arg(long, default_value = ".cache")]
        cache_dir: PathBuf,
    },

    /// Preview the assembled site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command.unwrap_or(Commands::Build { output: None }) {
        Commands::Build { output } => {
            commands::build::run(&cli.config, output).await?;
        }
        Commands::Update { output, cache_dir } => {
            commands::update::run(output, cache_dir).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(port, dir, !no_open).await?;
        }
    }

    Ok(())
}
