//! Download, merge and write the united database.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::fs;

use crate::error::DataError;
use crate::fln;
use crate::merge::merge;
use crate::record::{to_json, File};
use crate::sanitize;
use crate::sources::{Client, SourceUrls};

pub const XCSOAR_FILE: &str = "united.fln";
pub const LX_FILE: &str = "united-lx.fln";
pub const JSON_FILE: &str = "united.json";

/// Configuration for an update run.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Directory the united files are written to
    pub output_dir: PathBuf,

    /// Directory holding cached downloads
    pub cache_dir: PathBuf,

    /// How long a cached download stays fresh
    pub max_age: Duration,

    pub urls: SourceUrls,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            cache_dir: PathBuf::from(".cache"),
            max_age: Duration::from_secs(60 * 60),
            urls: SourceUrls::default(),
        }
    }
}

/// Result of an update run.
#[derive(Debug)]
pub struct UpdateResult {
    pub ogn_devices: usize,
    pub flarmnet_records: usize,
    pub weglide_users: usize,

    /// Number of records after merging
    pub records: usize,

    /// Files written, in order
    pub files: Vec<PathBuf>,

    pub duration_ms: u64,
}

/// Fetch all sources, merge them and write the united files.
pub async fn update(config: &UpdateConfig) -> Result<UpdateResult, DataError> {
    let start = Instant::now();
    let client = Client::new(config.urls.clone(), &config.cache_dir, config.max_age)?;

    let flarmnet = client.flarmnet().await?;
    tracing::debug!(flarmnet = flarmnet.records.len());

    let ogn = client.ogn_devices().await?;
    tracing::debug!(ogn = ogn.len());

    let weglide = client.weglide_users().await?;
    tracing::debug!(weglide = weglide.len());

    let ogn_devices = ogn.len();
    let flarmnet_records = flarmnet.records.len();
    let weglide_users = weglide.len();

    tracing::info!("Merging datasets...");
    let file = File {
        version: flarmnet.version,
        records: merge(ogn, flarmnet.records, weglide),
    };

    let files = write_outputs(&file, &config.output_dir).await?;

    Ok(UpdateResult {
        ogn_devices,
        flarmnet_records,
        weglide_users,
        records: file.records.len(),
        files,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Write `file` as XCSoar, LX and JSON files into `dir`.
pub async fn write_outputs(file: &File, dir: &Path) -> Result<Vec<PathBuf>, DataError> {
    fs::create_dir_all(dir).await.map_err(DataError::io(dir))?;

    let xcsoar = File {
        version: file.version,
        records: file.records.iter().map(sanitize::record_for_xcsoar).collect(),
    };
    let lx = File {
        version: file.version,
        records: file.records.iter().map(sanitize::record_for_lx).collect(),
    };
    let json = to_json(file).map_err(|source| DataError::Json {
        what: "united records",
        source,
    })?;

    let outputs = [
        (XCSOAR_FILE, fln::encode_xcsoar(&xcsoar)),
        (LX_FILE, fln::encode_lx(&lx)),
        (JSON_FILE, json),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (name, content) in outputs {
        let path = dir.join(name);
        tracing::info!("Writing {}...", path.display());
        fs::write(&path, content).await.map_err(DataError::io(&path))?;
        written.push(path);
    }

    Ok(written)
}
