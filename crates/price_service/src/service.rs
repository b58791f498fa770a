//! Prediction service
//!
//! Holds the model, the encoders and the feature schema behind a single
//! write-once cell. `load` reads and cross-checks all three before
//! publishing anything, so handlers either see a complete, consistent set
//! or nothing at all. A failed load is recorded and never retried.

use housepk_core::{
    ArtifactPaths, EncoderRegistry, FeatureLayout, FeatureSchema, FeatureVector, ForestModel,
    RawRequest,
};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fs;
use tracing::{info, warn};

use crate::catalog::{form_fields, FormField};
use crate::errors::ServiceError;
use crate::health::HealthReport;
use crate::pricing::{format_price, round2};

/// A successful prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Predicted price, rounded to two decimals
    #[serde(rename = "prediction")]
    pub value: f64,
    /// Display string, e.g. `PKR 12,345,000`
    pub formatted: String,
}

/// Everything a prediction needs, validated against each other
#[derive(Debug)]
struct LoadedArtifacts {
    model: ForestModel,
    layout: FeatureLayout,
    fields: Vec<FormField>,
}

impl LoadedArtifacts {
    fn read(paths: &ArtifactPaths) -> Result<Self, ServiceError> {
        let model =
            ForestModel::load_json(&paths.model).map_err(|e| ServiceError::load("model", e))?;
        verify_model_hash(&model, paths)?;

        let registry = EncoderRegistry::load(&paths.encoders)
            .map_err(|e| ServiceError::load("encoders", e))?;
        let schema =
            FeatureSchema::load(&paths.schema).map_err(|e| ServiceError::load("schema", e))?;

        if model.n_features != schema.len() {
            return Err(ServiceError::load(
                "model",
                format!(
                    "model expects {} features but the schema lists {}",
                    model.n_features,
                    schema.len()
                ),
            ));
        }

        let layout =
            FeatureLayout::bind(&schema, &registry).map_err(|e| ServiceError::load("schema", e))?;
        let fields = form_fields(&layout);

        info!(
            "Loaded model with {} trees, {} features, {} encoders",
            model.num_trees(),
            schema.len(),
            registry.len()
        );

        Ok(Self {
            model,
            layout,
            fields,
        })
    }
}

/// Compare the model against its stored digest when one exists
fn verify_model_hash(model: &ForestModel, paths: &ArtifactPaths) -> Result<(), ServiceError> {
    let stored = match fs::read_to_string(&paths.model_hash) {
        Ok(stored) => stored,
        Err(err) => {
            warn!(
                "No model hash at {} ({}), skipping integrity check",
                paths.model_hash.display(),
                err
            );
            return Ok(());
        }
    };

    let actual = model
        .hash_hex()
        .map_err(|e| ServiceError::load("model", e))?;
    if stored.trim() != actual {
        return Err(ServiceError::load(
            "model",
            format!("hash mismatch: stored {}, computed {}", stored.trim(), actual),
        ));
    }
    Ok(())
}

enum LoadState {
    Ready(LoadedArtifacts),
    Failed(String),
}

/// Model-backed price predictor shared by all request handlers
pub struct PredictionService {
    currency: String,
    state: OnceCell<LoadState>,
}

impl PredictionService {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            state: OnceCell::new(),
        }
    }

    /// Load, validate and publish the artifacts.
    ///
    /// Runs at most once; a failure leaves the service unloaded for good.
    pub fn load(&self, paths: &ArtifactPaths) -> Result<(), ServiceError> {
        if self.state.get().is_some() {
            return Err(ServiceError::AlreadyLoaded);
        }

        let (state, outcome) = match LoadedArtifacts::read(paths) {
            Ok(artifacts) => (LoadState::Ready(artifacts), Ok(())),
            Err(err) => (LoadState::Failed(err.to_string()), Err(err)),
        };

        self.state
            .set(state)
            .map_err(|_| ServiceError::AlreadyLoaded)?;
        outcome
    }

    fn artifacts(&self) -> Result<&LoadedArtifacts, ServiceError> {
        match self.state.get() {
            Some(LoadState::Ready(artifacts)) => Ok(artifacts),
            _ => Err(ServiceError::ServiceNotReady),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.artifacts().is_ok()
    }

    /// Reason the last load failed, if it did
    pub fn load_error(&self) -> Option<&str> {
        match self.state.get() {
            Some(LoadState::Failed(reason)) => Some(reason),
            _ => None,
        }
    }

    pub fn health(&self) -> HealthReport {
        HealthReport::new(self.is_ready())
    }

    /// Form inputs in model order
    pub fn form_fields(&self) -> Result<&[FormField], ServiceError> {
        Ok(&self.artifacts()?.fields)
    }

    pub fn vectorize(&self, request: &RawRequest) -> Result<FeatureVector, ServiceError> {
        Ok(self.artifacts()?.layout.vectorize(request)?)
    }

    pub fn predict(&self, request: &RawRequest) -> Result<Prediction, ServiceError> {
        let artifacts = self.artifacts()?;
        let vector = artifacts.layout.vectorize(request)?;
        let value = round2(artifacts.model.predict(&vector));

        Ok(Prediction {
            value,
            formatted: format_price(value, &self.currency),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use housepk_core::forest::{Node, Tree};
    use housepk_core::{FeatureSpec, ForestMetadata, LabelEncoder, NumericRange};
    use tempfile::TempDir;

    fn write_artifacts(dir: &std::path::Path) -> ArtifactPaths {
        let paths = ArtifactPaths::in_dir(dir);

        let schema = FeatureSchema::new(vec![
            FeatureSpec::categorical("city"),
            FeatureSpec::numeric("bedrooms", NumericRange::new(1.0, 6.0)),
        ])
        .unwrap();
        let registry: EncoderRegistry = [LabelEncoder::fit("city", ["Karachi", "Lahore"])]
            .into_iter()
            .collect();

        let tree = Tree::new(vec![
            Node::internal(0, 1, 2.5, 1, 2),
            Node::leaf(1, 4_000_000.0),
            Node::leaf(2, 9_500_000.125),
        ]);
        let model = ForestModel::new(
            2,
            vec![tree],
            ForestMetadata {
                n_estimators: 1,
                max_depth: Some(1),
                min_samples_split: 2,
                random_state: 42,
                training_rows: 4,
            },
        );

        let hash = model.save_json(&paths.model).unwrap();
        fs::write(&paths.model_hash, hash).unwrap();
        registry.save(&paths.encoders).unwrap();
        schema.save(&paths.schema).unwrap();
        paths
    }

    #[test]
    fn test_unloaded_service_refuses_work() {
        let service = PredictionService::new("PKR");
        let health = service.health();
        assert!(!health.is_healthy());
        assert!(!health.model_loaded && !health.encoders_loaded && !health.features_loaded);

        let request = RawRequest::new().with("city", "Lahore").with("bedrooms", 3_i64);
        assert!(matches!(
            service.predict(&request),
            Err(ServiceError::ServiceNotReady)
        ));
        assert!(matches!(
            service.form_fields(),
            Err(ServiceError::ServiceNotReady)
        ));
    }

    #[test]
    fn test_load_then_predict() {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path());
        let service = PredictionService::new("PKR");
        service.load(&paths).unwrap();

        let health = service.health();
        assert!(health.is_healthy());
        assert!(health.model_loaded && health.encoders_loaded && health.features_loaded);

        let request = RawRequest::new().with("city", "Lahore").with("bedrooms", 3_i64);
        assert_eq!(service.vectorize(&request).unwrap(), vec![1.0, 3.0]);

        let prediction = service.predict(&request).unwrap();
        assert_eq!(prediction.value, 9_500_000.13);
        assert_eq!(prediction.formatted, "PKR 9,500,000");

        // Same input, same answer
        assert_eq!(service.predict(&request).unwrap(), prediction);
    }

    #[test]
    fn test_validation_errors_pass_through() {
        let dir = TempDir::new().unwrap();
        let service = PredictionService::new("PKR");
        service.load(&write_artifacts(dir.path())).unwrap();

        let request = RawRequest::new().with("city", "Atlantis").with("bedrooms", 3_i64);
        match service.predict(&request) {
            Err(ServiceError::Validation(err)) => {
                assert_eq!(err.feature(), "city");
                assert_eq!(err.value(), Some("Atlantis"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_load_is_permanent() {
        let dir = TempDir::new().unwrap();
        let service = PredictionService::new("PKR");

        let err = service.load(&ArtifactPaths::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, ServiceError::ArtifactLoadFailure { .. }));
        assert!(service.load_error().is_some());
        assert!(!service.health().model_loaded);

        // Valid artifacts appearing later do not revive it
        let paths = write_artifacts(dir.path());
        assert!(matches!(
            service.load(&paths),
            Err(ServiceError::AlreadyLoaded)
        ));
        assert!(!service.is_ready());
        assert!(!service.health().features_loaded);
    }

    #[test]
    fn test_feature_count_mismatch_blocks_publish() {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path());
        FeatureSchema::new(vec![FeatureSpec::categorical("city")])
            .unwrap()
            .save(&paths.schema)
            .unwrap();

        let service = PredictionService::new("PKR");
        let err = service.load(&paths).unwrap_err();
        assert!(err.to_string().contains("model expects 2 features"));
        assert!(!service.is_ready());
    }

    #[test]
    fn test_tampered_model_hash_blocks_publish() {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path());
        fs::write(&paths.model_hash, "00ff").unwrap();

        let service = PredictionService::new("PKR");
        let err = service.load(&paths).unwrap_err();
        assert!(err.to_string().contains("hash mismatch"));
        assert!(!service.is_ready());
    }

    #[test]
    fn test_missing_hash_file_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let paths = write_artifacts(dir.path());
        fs::remove_file(&paths.model_hash).unwrap();

        let service = PredictionService::new("PKR");
        service.load(&paths).unwrap();
        assert!(service.is_ready());
    }
}
