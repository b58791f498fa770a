use crate::config::ConfigError;
use housepk_core::features::{EncodeError, RegistryError, SchemaError};
use housepk_core::{ArtifactError, ModelError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned by the pipeline stages and the forest trainer.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("bincode error in {}: {source}", path.display())]
    Bincode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': invalid numeric value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("training error: {0}")]
    Training(String),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl TrainerError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn bincode(path: &Path, source: bincode::Error) -> Self {
        Self::Bincode {
            path: path.to_path_buf(),
            source,
        }
    }
}
