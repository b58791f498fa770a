//! Encoder registry: one label encoder per categorical feature

use super::encoder::{EncodeError, LabelEncoder};
use crate::artifacts::{read_json, write_canonical};
use crate::errors::ArtifactError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Invalid encoder registry: {0}")]
    Invalid(String),
}

/// Feature name to fitted encoder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderRegistry {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl EncoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an encoder under its own feature name, replacing any previous one
    pub fn insert(&mut self, encoder: LabelEncoder) -> Option<LabelEncoder> {
        self.encoders.insert(encoder.feature().to_string(), encoder)
    }

    pub fn get(&self, feature: &str) -> Option<&LabelEncoder> {
        self.encoders.get(feature)
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.encoders.contains_key(feature)
    }

    /// Encode `value` with the encoder of `feature`.
    ///
    /// A feature without an encoder has no known categories at all.
    pub fn encode(&self, feature: &str, value: &str) -> Result<u32, EncodeError> {
        match self.encoders.get(feature) {
            Some(encoder) => encoder.encode(value),
            None => Err(EncodeError::UnknownCategory {
                feature: feature.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        for (name, encoder) in &self.encoders {
            if name != encoder.feature() {
                return Err(RegistryError::Invalid(format!(
                    "key '{}' holds encoder for '{}'",
                    name,
                    encoder.feature()
                )));
            }
            encoder.validate().map_err(RegistryError::Invalid)?;
        }
        Ok(())
    }

    /// Persist as canonical JSON; returns the blake3 hex digest
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<String, RegistryError> {
        Ok(write_canonical(path, self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let registry: Self = read_json(path)?;
        registry.validate()?;
        Ok(registry)
    }
}

impl FromIterator<LabelEncoder> for EncoderRegistry {
    fn from_iter<I: IntoIterator<Item = LabelEncoder>>(iter: I) -> Self {
        let mut registry = Self::new();
        for encoder in iter {
            registry.insert(encoder);
        }
        registry
    }
}
