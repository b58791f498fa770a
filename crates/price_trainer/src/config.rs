//! Pipeline configuration (`params.yaml`)
//!
//! One YAML document with a section per stage plus shared paths. Only the
//! input/output files, the feature lists and the forest hyperparameters
//! have to be written out; every other key has a default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Full `params.yaml` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub prepare: PrepareConfig,
    pub features: FeaturesConfig,
    pub train: TrainConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Clean stage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_target")]
    pub target_column: String,
    #[serde(default = "default_required_columns")]
    pub required_columns: Vec<String>,
    #[serde(default = "default_outlier_quantile")]
    pub outlier_quantile: f64,
    /// Rows whose value exceeds the cap are dropped
    #[serde(default = "default_count_caps")]
    pub count_caps: BTreeMap<String, f64>,
    #[serde(default = "default_fill_columns")]
    pub fill_columns: Vec<String>,
    #[serde(default = "default_fill_value")]
    pub fill_value: String,
}

/// Feature stage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    pub selected_features: Vec<String>,
    #[serde(default = "default_categorical_features")]
    pub categorical_features: Vec<String>,
    pub target: String,
    pub test_size: f64,
    pub random_state: u64,
}

/// Forest hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub n_estimators: usize,
    /// `None` grows trees until leaves are pure or too small to split
    #[serde(default)]
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub random_state: u64,
}

/// Where stage outputs are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
    #[serde(default = "default_metrics_file")]
    pub metrics_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            models_dir: default_models_dir(),
            metrics_file: default_metrics_file(),
        }
    }
}

fn default_id_column() -> String {
    "property_id".to_string()
}

fn default_target() -> String {
    "price".to_string()
}

fn default_required_columns() -> Vec<String> {
    ["price", "bedrooms", "baths", "Area Size"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_outlier_quantile() -> f64 {
    0.99
}

fn default_count_caps() -> BTreeMap<String, f64> {
    BTreeMap::from([("bedrooms".to_string(), 20.0), ("baths".to_string(), 20.0)])
}

fn default_fill_columns() -> Vec<String> {
    vec!["agency".to_string(), "agent".to_string()]
}

fn default_fill_value() -> String {
    "Unknown".to_string()
}

fn default_categorical_features() -> Vec<String> {
    [
        "property_type",
        "city",
        "province_name",
        "Area Type",
        "Area Category",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_metrics_file() -> PathBuf {
    PathBuf::from("metrics/eval.json")
}

impl PipelineConfig {
    /// Load and validate a YAML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PipelineConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let quantile = self.prepare.outlier_quantile;
        if !(quantile > 0.0 && quantile <= 1.0) {
            errors.push(format!("outlier_quantile must be in (0, 1], got {quantile}"));
        }
        for (column, cap) in &self.prepare.count_caps {
            if !cap.is_finite() {
                errors.push(format!("count cap for '{column}' must be finite"));
            }
        }

        let features = &self.features;
        if features.selected_features.is_empty() {
            errors.push("selected_features must not be empty".to_string());
        }
        if !(features.test_size > 0.0 && features.test_size < 1.0) {
            errors.push(format!(
                "test_size must be in (0, 1), got {}",
                features.test_size
            ));
        }
        if features.selected_features.contains(&features.target) {
            errors.push(format!(
                "target '{}' is also listed as a feature",
                features.target
            ));
        }
        for name in &features.categorical_features {
            if !features.selected_features.contains(name) {
                errors.push(format!("categorical feature '{name}' is not selected"));
            }
        }

        if self.train.n_estimators == 0 {
            errors.push("n_estimators must be at least 1".to_string());
        }
        if self.train.min_samples_split < 2 {
            errors.push(format!(
                "min_samples_split must be at least 2, got {}",
                self.train.min_samples_split
            ));
        }
        if self.train.max_depth == Some(0) {
            errors.push("max_depth must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
prepare:
  input_file: data/raw/zameen.csv
  output_file: data/processed/cleaned.csv
features:
  selected_features: [city, bedrooms, Area Size]
  categorical_features: [city]
  target: price
  test_size: 0.2
  random_state: 42
train:
  n_estimators: 10
  max_depth: 20
  min_samples_split: 5
  random_state: 42
"#;

    fn minimal() -> PipelineConfig {
        serde_yaml::from_str(MINIMAL).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = minimal();
        assert!(config.validate().is_ok());
        assert_eq!(config.prepare.id_column, "property_id");
        assert_eq!(config.prepare.outlier_quantile, 0.99);
        assert_eq!(config.prepare.count_caps.get("bedrooms"), Some(&20.0));
        assert_eq!(config.prepare.fill_value, "Unknown");
        assert_eq!(config.paths.models_dir, PathBuf::from("models"));
        assert_eq!(config.train.max_depth, Some(20));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = minimal();
        config.features.test_size = 1.0;
        assert!(config.validate().is_err());

        let mut config = minimal();
        config.prepare.outlier_quantile = 0.0;
        assert!(config.validate().is_err());

        let mut config = minimal();
        config.train.min_samples_split = 1;
        assert!(config.validate().is_err());

        let mut config = minimal();
        config.train.n_estimators = 0;
        assert!(config.validate().is_err());

        let mut config = minimal();
        config.features.categorical_features.push("province_name".to_string());
        assert!(config.validate().is_err());

        let mut config = minimal();
        config.features.selected_features.push("price".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let err = PipelineConfig::load("does/not/exist.yaml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.yaml"));
    }
}
