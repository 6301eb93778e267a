//! Static site assembler for the united FLARM database download page.
//!
//! Resets an output directory, copies the static assets into it verbatim and renders the
//! HTML template with the current build time.

pub mod builder;
pub mod template;

pub use builder::{AssetSpec, BuildConfig, BuildError, BuildResult, StaticBuilder, TemplateSpec};
pub use template::{render_template, timestamp, Rendered, TIME_MARKER};
