//! Prediction service error types

use housepk_core::VectorizeError;
use thiserror::Error;

/// Prediction service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Artifacts were never loaded, or loading failed
    #[error("Model artifacts are not loaded")]
    ServiceNotReady,

    #[error("Failed to load {artifact}: {reason}")]
    ArtifactLoadFailure { artifact: String, reason: String },

    /// A second load was attempted
    #[error("Artifacts have already been loaded")]
    AlreadyLoaded,

    #[error(transparent)]
    Validation(#[from] VectorizeError),
}

impl ServiceError {
    pub(crate) fn load(artifact: &str, reason: impl ToString) -> Self {
        Self::ArtifactLoadFailure {
            artifact: artifact.to_string(),
            reason: reason.to_string(),
        }
    }
}
