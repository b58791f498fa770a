//! Request vectorizer
//!
//! Walks the layout in schema order and stops at the first field that is
//! missing or invalid. The output always has one value per column.

use super::encoder::EncodeError;
use super::layout::{ColumnKind, FeatureLayout};
use super::request::{RawRequest, RawValue};
use thiserror::Error;

/// Feature vector in schema order
pub type FeatureVector = Vec<f64>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorizeError {
    #[error("Missing value for: {feature}")]
    MissingField { feature: String },

    #[error("Invalid value '{value}' for {feature}")]
    InvalidCategoricalValue {
        feature: String,
        value: String,
        #[source]
        source: EncodeError,
    },

    #[error("Invalid numeric value '{value}' for {feature}")]
    InvalidNumericValue { feature: String, value: String },
}

impl VectorizeError {
    /// Field the error refers to
    pub fn feature(&self) -> &str {
        match self {
            VectorizeError::MissingField { feature }
            | VectorizeError::InvalidCategoricalValue { feature, .. }
            | VectorizeError::InvalidNumericValue { feature, .. } => feature,
        }
    }

    /// Offending value, absent for missing fields
    pub fn value(&self) -> Option<&str> {
        match self {
            VectorizeError::MissingField { .. } => None,
            VectorizeError::InvalidCategoricalValue { value, .. }
            | VectorizeError::InvalidNumericValue { value, .. } => Some(value),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            VectorizeError::MissingField { .. } => "missing_field",
            VectorizeError::InvalidCategoricalValue { .. } => "invalid_categorical_value",
            VectorizeError::InvalidNumericValue { .. } => "invalid_numeric_value",
        }
    }
}

impl FeatureLayout {
    /// Turn one request into a feature vector
    pub fn vectorize(&self, request: &RawRequest) -> Result<FeatureVector, VectorizeError> {
        let mut vector = Vec::with_capacity(self.len());

        for column in self.columns() {
            let raw = match request.get(&column.name) {
                Some(raw) if !raw.is_blank() => raw,
                _ => {
                    return Err(VectorizeError::MissingField {
                        feature: column.name.clone(),
                    })
                }
            };

            let value = match &column.kind {
                ColumnKind::Categorical(encoder) => {
                    let label = raw.render();
                    let code = encoder.encode(&label).map_err(|source| {
                        VectorizeError::InvalidCategoricalValue {
                            feature: column.name.clone(),
                            value: label.to_string(),
                            source,
                        }
                    })?;
                    f64::from(code)
                }
                ColumnKind::Numeric(_) => parse_numeric(raw).ok_or_else(|| {
                    VectorizeError::InvalidNumericValue {
                        feature: column.name.clone(),
                        value: raw.render().into_owned(),
                    }
                })?,
            };

            vector.push(value);
        }

        Ok(vector)
    }
}

fn parse_numeric(raw: &RawValue) -> Option<f64> {
    let value = match raw {
        RawValue::Number(number) => number.as_f64()?,
        RawValue::Text(text) => text.trim().parse::<f64>().ok()?,
        RawValue::Null => return None,
    };
    value.is_finite().then_some(value)
}
