//! Optional `webpage.toml` configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use united_web_static::{AssetSpec, BuildConfig};

/// Configuration file structure (webpage.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    output: OutputConfig,
    #[serde(default)]
    template: TemplateConfig,
    /// Replaces the default asset list when present
    assets: Option<Vec<AssetEntry>>,
}

#[derive(Debug, Deserialize, Default)]
struct OutputConfig {
    dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct TemplateConfig {
    source: Option<PathBuf>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssetEntry {
    source: PathBuf,
    name: Option<String>,
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(ConfigFile::default());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

impl ConfigFile {
    /// Merge the file over the built-in defaults, with `output` taking precedence.
    pub fn into_build_config(self, output: Option<PathBuf>) -> Result<BuildConfig> {
        let mut config = BuildConfig::default();

        if let Some(dir) = output.or(self.output.dir) {
            config.output_dir = dir;
        }
        if let Some(source) = self.template.source {
            config.template.source = source;
        }
        if let Some(name) = self.template.name {
            config.template.name = name;
        }

        if let Some(entries) = self.assets {
            config.assets = entries
                .into_iter()
                .map(|entry| match entry.name {
                    Some(name) => Ok(AssetSpec::new(entry.source, name)),
                    None => AssetSpec::from_source(&entry.source).with_context(|| {
                        format!(
                            "Asset {} has no file name, set `name` explicitly",
                            entry.source.display()
                        )
                    }),
                })
                .collect::<Result<_>>()?;
        }

        Ok(config)
    }
}
