//! Database update command.

use std::path::PathBuf;

use anyhow::Result;
use united_data::UpdateConfig;

/// Run the update command.
pub async fn run(output: PathBuf, cache_dir: PathBuf) -> Result<()> {
    let config = UpdateConfig {
        output_dir: output,
        cache_dir,
        ..Default::default()
    };

    let result = united_data::update(&config).await?;

    tracing::info!(
        "Merged {} OGN devices, {} FlarmNet records and {} WeGlide users into {} records in {}ms",
        result.ogn_devices,
        result.flarmnet_records,
        result.weglide_users,
        result.records,
        result.duration_ms
    );

    for file in &result.files {
        tracing::info!("Wrote {}", file.display());
    }

    Ok(())
}
