//! Build-time stamping of the page template.

use chrono::{DateTime, SecondsFormat, Utc};

/// Marker replaced with the render timestamp.
pub const TIME_MARKER: &str = "{{time}}";

/// A rendered template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Rendered document text
    pub html: String,
    /// Number of markers that were replaced
    pub replacements: usize,
}

/// Format a render time as an ISO-8601 UTC timestamp with millisecond precision,
/// e.g. `2024-03-01T12:30:05.000Z`.
pub fn timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Replace every literal occurrence of [`TIME_MARKER`] in `template` with `timestamp`.
///
/// This is plain substring replacement. Anything that is not exactly `{{time}}` is left alone.
pub fn render_template(template: &str, timestamp: &str) -> Rendered {
    let replacements = template.matches(TIME_MARKER).count();
    let html = template.replace(TIME_MARKER, timestamp);

    Rendered { html, replacements }
}
