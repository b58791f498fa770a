//! Feature layout: the schema bound to its encoders
//!
//! Binding is where schema and registry are checked against each other.
//! After that every column is an explicit `Categorical(encoder)` or
//! `Numeric(range)` and the registry is no longer consulted.

use super::encoder::LabelEncoder;
use super::registry::EncoderRegistry;
use super::schema::{FeatureKind, FeatureSchema, NumericRange, SchemaError};

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    Categorical(LabelEncoder),
    Numeric(NumericRange),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayout {
    columns: Vec<Column>,
}

impl FeatureLayout {
    /// Bind `schema` to `registry`.
    ///
    /// Every categorical feature needs an encoder and every encoder needs a
    /// categorical feature.
    pub fn bind(schema: &FeatureSchema, registry: &EncoderRegistry) -> Result<Self, SchemaError> {
        let mut columns = Vec::with_capacity(schema.len());

        for spec in schema.specs() {
            let kind = match &spec.kind {
                FeatureKind::Categorical => {
                    let encoder = registry
                        .get(&spec.name)
                        .ok_or_else(|| SchemaError::MissingEncoder(spec.name.clone()))?;
                    ColumnKind::Categorical(encoder.clone())
                }
                FeatureKind::Numeric(range) => ColumnKind::Numeric(*range),
            };
            columns.push(Column {
                name: spec.name.clone(),
                kind,
            });
        }

        for feature in registry.feature_names() {
            let categorical = schema.get(feature).is_some_and(|spec| spec.is_categorical());
            if !categorical {
                return Err(SchemaError::OrphanEncoder(feature.to_string()));
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
