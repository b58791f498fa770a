//! Random forest regression model
//!
//! Implements the fitted ensemble with:
//! - Mean-of-trees inference
//! - Canonical JSON serialization
//! - Blake3 model hashing

use super::tree::Tree;
use crate::artifacts::{read_json, write_canonical};
use crate::errors::ArtifactError;
use crate::serde_canon::{hash_canonical_hex, to_canonical_json};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Forest model errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl From<crate::serde_canon::CanonicalError> for ModelError {
    fn from(err: crate::serde_canon::CanonicalError) -> Self {
        ModelError::Artifact(err.into())
    }
}

pub const FORMAT_VERSION: u32 = 1;

/// Hyperparameters and data shape the forest was fitted with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestMetadata {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub random_state: u64,
    pub training_rows: usize,
}

/// Fitted random forest regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    /// Model format version
    pub version: u32,

    /// Length of the feature vectors the model expects
    pub n_features: usize,

    /// Trees in the ensemble
    pub trees: Vec<Tree>,

    pub metadata: ForestMetadata,
}

impl ForestModel {
    pub fn new(n_features: usize, trees: Vec<Tree>, metadata: ForestMetadata) -> Self {
        Self {
            version: FORMAT_VERSION,
            n_features,
            trees,
            metadata,
        }
    }

    /// Validate model structure
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.version != FORMAT_VERSION {
            return Err(ModelError::ValidationFailed(format!(
                "Unsupported model version: {}",
                self.version
            )));
        }

        if self.n_features == 0 {
            return Err(ModelError::ValidationFailed(
                "Model expects zero features".to_string(),
            ));
        }

        if self.trees.is_empty() {
            return Err(ModelError::ValidationFailed(
                "Model has no trees".to_string(),
            ));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|e| {
                ModelError::ValidationFailed(format!("Tree {} validation failed: {}", i, e))
            })?;
        }

        Ok(())
    }

    /// Predict one row: the mean of all tree outputs.
    ///
    /// `features` must have `n_features` entries.
    pub fn predict(&self, features: &[f64]) -> f64 {
        debug_assert_eq!(features.len(), self.n_features);

        if self.trees.is_empty() {
            return 0.0;
        }

        let sum: f64 = self.trees.iter().map(|tree| tree.evaluate(features)).sum();
        sum / self.trees.len() as f64
    }

    /// Predict every row of a row-major slice
    pub fn predict_rows<'a, I>(&self, rows: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        rows.into_iter().map(|row| self.predict(row)).collect()
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Serialize model to canonical JSON (sorted keys, no whitespace)
    pub fn to_canonical_json(&self) -> Result<String, ModelError> {
        Ok(to_canonical_json(self)?)
    }

    /// Blake3 hash of the canonical JSON representation
    pub fn hash_hex(&self) -> Result<String, ModelError> {
        Ok(hash_canonical_hex(self)?)
    }

    /// Save model as canonical JSON; returns the blake3 hex digest
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<String, ModelError> {
        Ok(write_canonical(path, self)?)
    }

    /// Load and validate a model from JSON
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let model: ForestModel = read_json(path)?;
        model.validate()?;
        Ok(model)
    }
}
