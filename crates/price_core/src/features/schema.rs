//! Feature schema: the ordered, kind-tagged columns the model was trained on

use crate::artifacts::{read_json, write_canonical};
use crate::errors::ArtifactError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Feature schema is empty")]
    Empty,

    #[error("Duplicate feature in schema: {0}")]
    Duplicate(String),

    #[error("Categorical feature '{0}' has no encoder")]
    MissingEncoder(String),

    #[error("Encoder '{0}' does not match a categorical feature in the schema")]
    OrphanEncoder(String),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Observed value range of a numeric feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Smallest range covering every finite value, `None` if there are none
    pub fn observe<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some(Self::new(v, v)),
                Some(r) => Some(Self::new(r.min.min(v), r.max.max(v))),
            })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// How a column is turned into a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureKind {
    /// Encoded through the registry entry of the same name
    Categorical,
    /// Parsed as a float
    Numeric(NumericRange),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub kind: FeatureKind,
}

impl FeatureSpec {
    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Categorical,
        }
    }

    pub fn numeric(name: impl Into<String>, range: NumericRange) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Numeric(range),
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, FeatureKind::Categorical)
    }
}

#[derive(Deserialize)]
struct SchemaRepr {
    features: Vec<FeatureSpec>,
}

impl TryFrom<SchemaRepr> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(repr: SchemaRepr) -> Result<Self, Self::Error> {
        FeatureSchema::new(repr.features)
    }
}

/// Ordered feature list; position `i` is column `i` of every feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaRepr")]
pub struct FeatureSchema {
    features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    /// Build a schema, rejecting empty lists and duplicate names
    pub fn new(features: Vec<FeatureSpec>) -> Result<Self, SchemaError> {
        if features.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = HashSet::with_capacity(features.len());
        for spec in &features {
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaError::Duplicate(spec.name.clone()));
            }
        }
        Ok(Self { features })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|spec| spec.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&FeatureSpec> {
        self.features.iter().find(|spec| spec.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|spec| spec.name.as_str())
    }

    pub fn categorical_names(&self) -> impl Iterator<Item = &str> {
        self.features
            .iter()
            .filter(|spec| spec.is_categorical())
            .map(|spec| spec.name.as_str())
    }

    pub fn specs(&self) -> &[FeatureSpec] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Persist as canonical JSON; returns the blake3 hex digest
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<String, SchemaError> {
        Ok(write_canonical(path, self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        Ok(read_json(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(vec![
            FeatureSpec::categorical("city"),
            FeatureSpec::numeric("bedrooms", NumericRange::new(1.0, 12.0)),
            FeatureSpec::categorical("Area Type"),
        ])
        .unwrap()
    }

    #[test]
    fn test_membership_and_order() {
        let schema = schema();
        assert!(schema.contains("bedrooms"));
        assert!(!schema.contains("price"));
        assert_eq!(schema.position("Area Type"), Some(2));
        assert_eq!(
            schema.names().collect::<Vec<_>>(),
            vec!["city", "bedrooms", "Area Type"]
        );
        assert_eq!(
            schema.categorical_names().collect::<Vec<_>>(),
            vec!["city", "Area Type"]
        );
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(FeatureSchema::new(vec![]), Err(SchemaError::Empty)));
        let dup = FeatureSchema::new(vec![
            FeatureSpec::categorical("city"),
            FeatureSpec::numeric("city", NumericRange::new(0.0, 1.0)),
        ]);
        assert!(matches!(dup, Err(SchemaError::Duplicate(name)) if name == "city"));
    }

    #[test]
    fn test_kind_serialization_is_tagged() {
        let json = serde_json::to_string(&FeatureSpec::numeric(
            "baths",
            NumericRange::new(1.0, 10.0),
        ))
        .unwrap();
        assert!(json.contains(r#""type":"numeric""#));
        assert!(json.contains(r#""min":1.0"#));

        let json = serde_json::to_string(&FeatureSpec::categorical("city")).unwrap();
        assert!(json.contains(r#""type":"categorical""#));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feature_names.json");
        let schema = schema();
        schema.save(&path).unwrap();
        assert_eq!(FeatureSchema::load(&path).unwrap(), schema);
    }

    #[test]
    fn test_deserialize_enforces_invariants() {
        let dup = r#"{"features":[{"name":"a","kind":{"type":"categorical"}},{"name":"a","kind":{"type":"categorical"}}]}"#;
        assert!(serde_json::from_str::<FeatureSchema>(dup).is_err());
        assert!(serde_json::from_str::<FeatureSchema>(r#"{"features":[]}"#).is_err());
    }

    #[test]
    fn test_numeric_range_observe() {
        let range = NumericRange::observe([3.0, f64::NAN, -1.5, 7.25]).unwrap();
        assert_eq!(range, NumericRange::new(-1.5, 7.25));
        assert!(range.contains(0.0));
        assert!(!range.contains(8.0));
        assert!(NumericRange::observe(Vec::new()).is_none());
    }
}
