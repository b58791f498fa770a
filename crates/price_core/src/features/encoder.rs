//! Label encoder for a single categorical feature
//!
//! Classes are stored sorted, so the code of a label is its position and
//! fitting is independent of row order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Encoding failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("unknown category '{value}' for feature '{feature}'")]
    UnknownCategory { feature: String, value: String },
}

/// Fitted string-to-code mapping for one feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    feature: String,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit on the observed column values.
    pub fn fit<I, S>(feature: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = values
            .into_iter()
            .map(|value| value.as_ref().to_string())
            .collect();

        Self {
            feature: feature.into(),
            classes: classes.into_iter().collect(),
        }
    }

    /// Feature this encoder was fitted for
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Code for `value`, failing on labels not seen during fitting
    pub fn encode(&self, value: &str) -> Result<u32, EncodeError> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .map(|idx| idx as u32)
            .map_err(|_| EncodeError::UnknownCategory {
                feature: self.feature.clone(),
                value: value.to_string(),
            })
    }

    /// Label for a code
    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    /// Known labels in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Check the invariants a deserialized encoder must satisfy
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err(format!("encoder for '{}' has no classes", self.feature));
        }
        if let Some(pair) = self.classes.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(format!(
                "encoder for '{}' classes are not strictly sorted at '{}' / '{}'",
                self.feature, pair[0], pair[1]
            ));
        }
        Ok(())
    }
}
