//! Site assembly command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use united_web_static::StaticBuilder;

use super::config::load_config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Assembling webpage...");

    let config = load_config(config_path)?.into_build_config(output)?;
    let result = StaticBuilder::new(config).build().await?;

    tracing::info!(
        "Copied {} assets ({} bytes) and stamped {} in {}ms",
        result.assets,
        result.bytes_copied,
        result.rendered_at,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
