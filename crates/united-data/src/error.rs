//! Errors raised while building the database.

use std::io;
use std::path::PathBuf;

use crate::fln::DecodeError;

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to download {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse {what}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode FlarmNet file")]
    Decode(#[from] DecodeError),

    #[error("Failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> DataError {
        let path = path.into();
        move |source| DataError::Io { path, source }
    }
}
