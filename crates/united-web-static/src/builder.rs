//! Static site assembler.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::fs;

use crate::template::{render_template, timestamp};

/// A static file copied verbatim into the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSpec {
    /// Source file
    pub source: PathBuf,

    /// File name inside the output directory
    pub name: String,
}

impl AssetSpec {
    /// Create an asset written under an explicit output name.
    pub fn new(source: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
        }
    }

    /// Create an asset that keeps the file name of its source.
    ///
    /// Returns `None` if the source has no (UTF-8) file name.
    pub fn from_source(source: impl Into<PathBuf>) -> Option<Self> {
        let source = source.into();
        let name = source.file_name()?.to_str()?.to_string();
        Some(Self { source, name })
    }
}

/// The HTML template that gets stamped with the build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    /// Template source file
    pub source: PathBuf,

    /// File name of the rendered document inside the output directory
    pub name: String,
}

impl Default for TemplateSpec {
    fn default() -> Self {
        Self {
            source: PathBuf::from("webpage/index.html"),
            name: "index.html".to_string(),
        }
    }
}

/// Configuration for assembling the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Output directory, wiped on every build
    pub output_dir: PathBuf,

    /// Page template
    pub template: TemplateSpec,

    /// Assets to copy, in order
    pub assets: Vec<AssetSpec>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            template: TemplateSpec::default(),
            assets: default_assets(),
        }
    }
}

/// The assets published next to the download page.
pub fn default_assets() -> Vec<AssetSpec> {
    vec![
        AssetSpec::new("webpage/background.webp", "background.webp"),
        AssetSpec::new("united.fln", "united.fln"),
        AssetSpec::new("united.json", "united.json"),
        AssetSpec::new("united-lx.fln", "united-lx.fln"),
    ]
}

impl BuildConfig {
    /// Check the configuration before anything on disk is touched.
    pub fn validate(&self) -> Result<(), BuildError> {
        self.validate_output_dir()?;

        let mut seen = HashSet::new();
        let names = self
            .assets
            .iter()
            .map(|asset| &asset.name)
            .chain(std::iter::once(&self.template.name));

        for name in names {
            if !is_bare_file_name(name) {
                return Err(BuildError::Config(format!(
                    "output name {name:?} must be a plain file name"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(BuildError::Config(format!(
                    "output name {name:?} is used more than once"
                )));
            }
        }

        Ok(())
    }

    /// The reset wipes the output directory, so it must not resolve to the working
    /// directory, one of its ancestors, or a directory holding any input.
    fn validate_output_dir(&self) -> Result<(), BuildError> {
        let refuse = |reason: &str| {
            BuildError::Config(format!(
                "refusing to use {:?} as output directory: {reason}",
                self.output_dir
            ))
        };

        let mut components = self.output_dir.components();
        if components.clone().any(|c| c == Component::ParentDir) {
            return Err(refuse("it must not contain `..`"));
        }
        if !components.any(|c| matches!(c, Component::Normal(_))) {
            return Err(refuse("it names no directory of its own"));
        }

        let output_dir = lexical_absolute(&self.output_dir)?;

        let cwd = std::env::current_dir()
            .map_err(|e| BuildError::Config(format!("cannot determine working directory: {e}")))?;
        if cwd.starts_with(&output_dir) {
            return Err(refuse("it contains the working directory"));
        }

        let sources = self
            .assets
            .iter()
            .map(|asset| &asset.source)
            .chain(std::iter::once(&self.template.source));

        for source in sources {
            if lexical_absolute(source)?.starts_with(&output_dir) {
                return Err(refuse(
                    format!("it contains the input {}", source.display()).as_str(),
                ));
            }
        }

        Ok(())
    }
}

/// Make `path` absolute and fold away `.` and `..` without touching the filesystem.
fn lexical_absolute(path: &Path) -> Result<PathBuf, BuildError> {
    let absolute = std::path::absolute(path).map_err(|e| {
        BuildError::Config(format!("cannot resolve {}: {e}", path.display()))
    })?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

fn is_bare_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(first)), None) if first == OsStr::new(name)
    )
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of assets copied
    pub assets: usize,

    /// Total bytes copied across all assets
    pub bytes_copied: u64,

    /// Number of time markers replaced in the template
    pub markers_replaced: usize,

    /// Timestamp written into the rendered document
    pub rendered_at: String,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Invalid build configuration: {0}")]
    Config(String),

    #[error("Failed to reset output directory {}", path.display())]
    Reset {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to copy {} to {}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read template {}", path.display())]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Remove `path` with everything in it, then recreate it empty.
///
/// A missing directory is not an error.
pub async fn reset_output_dir(path: &Path) -> Result<(), BuildError> {
    let reset_error = |source: io::Error| BuildError::Reset {
        path: path.to_path_buf(),
        source,
    };

    match fs::remove_dir_all(path).await {
        Ok(()) => tracing::debug!("Removed previous output in {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(reset_error(e)),
    }

    fs::create_dir_all(path).await.map_err(reset_error)
}

/// Copy `from` to `to` byte for byte, returning the number of bytes copied.
pub async fn copy_asset(from: &Path, to: &Path) -> Result<u64, BuildError> {
    fs::copy(from, to).await.map_err(|source| BuildError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Write a rendered document to `path`.
pub async fn write_page(path: &Path, html: &str) -> Result<(), BuildError> {
    fs::write(path, html)
        .await
        .map_err(|source| BuildError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build the site, stamping the template with the current time.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        self.build_at(Utc::now()).await
    }

    /// Build the site, stamping the template with `rendered_at`.
    pub async fn build_at(&self, rendered_at: DateTime<Utc>) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        self.config.validate()?;

        let output_dir = &self.config.output_dir;
        tracing::info!("Resetting {}", output_dir.display());
        reset_output_dir(output_dir).await?;

        let mut bytes_copied = 0;
        for asset in &self.config.assets {
            let destination = output_dir.join(&asset.name);
            let bytes = copy_asset(&asset.source, &destination).await?;
            tracing::debug!(
                "Copied {} -> {} ({} bytes)",
                asset.source.display(),
                destination.display(),
                bytes
            );
            bytes_copied += bytes;
        }
        tracing::info!("Copied {} assets", self.config.assets.len());

        let stamp = timestamp(rendered_at);
        let markers_replaced = self.render_page(&stamp).await?;

        Ok(BuildResult {
            assets: self.config.assets.len(),
            bytes_copied,
            markers_replaced,
            rendered_at: stamp,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: output_dir.clone(),
        })
    }

    /// Render the template into the output directory.
    async fn render_page(&self, stamp: &str) -> Result<usize, BuildError> {
        let template = &self.config.template;

        let source = fs::read_to_string(&template.source)
            .await
            .map_err(|source| BuildError::ReadTemplate {
                path: template.source.clone(),
                source,
            })?;

        let rendered = render_template(&source, stamp);
        if rendered.replacements == 0 {
            tracing::warn!(
                "Template {} contains no time marker",
                template.source.display()
            );
        }

        let destination = self.config.output_dir.join(&template.name);
        write_page(&destination, &rendered.html).await?;

        tracing::info!(
            "Rendered {} at {} ({} markers)",
            destination.display(),
            stamp,
            rendered.replacements
        );

        Ok(rendered.replacements)
    }
}
