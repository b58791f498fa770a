//! Error types for persisted artifacts

use crate::serde_canon::CanonicalError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing an artifact file
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Reading or writing the file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not valid JSON for the expected type
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be rendered as canonical JSON
    #[error(transparent)]
    Canonical(#[from] CanonicalError),
}

impl ArtifactError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
