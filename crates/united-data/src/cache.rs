//! On-disk cache for downloaded source data.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;

use crate::error::DataError;

/// A single cached download, refreshed once it is older than `max_age`.
#[derive(Debug)]
pub struct Cache {
    path: PathBuf,
    max_age: Duration,
}

impl Cache {
    pub fn new(dir: &Path, name: &str, max_age: Duration) -> Self {
        Self {
            path: dir.join(name),
            max_age,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable entries need an update. Entries modified in the future do not.
    pub async fn needs_update(&self) -> bool {
        let Ok(metadata) = fs::metadata(&self.path).await else {
            return true;
        };
        let Ok(modified) = metadata.modified() else {
            return true;
        };

        match modified.elapsed() {
            Ok(elapsed) => elapsed > self.max_age,
            Err(_) => false,
        }
    }

    pub async fn read(&self) -> Result<String, DataError> {
        fs::read_to_string(&self.path)
            .await
            .map_err(DataError::io(&self.path))
    }

    pub async fn save(&self, content: &str) -> Result<(), DataError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).await.map_err(DataError::io(dir))?;
            }
        }

        tracing::debug!("Caching {} ({} bytes)", self.path.display(), content.len());
        fs::write(&self.path, content)
            .await
            .map_err(DataError::io(&self.path))
    }
}
