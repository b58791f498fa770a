//! Evaluate stage: regression metrics on the held-out split

use housepk_core::{ArtifactPaths, ForestModel};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

use crate::config::PipelineConfig;
use crate::dataset::DataPaths;
use crate::errors::TrainerError;

/// Metrics written to the metrics file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub r2_score: f64,
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
}

impl Metrics {
    /// Compare predictions against true values.
    ///
    /// A constant `y_true` gives R² of 1.0 for a perfect fit and 0.0 otherwise.
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Result<Self, TrainerError> {
        if y_true.len() != y_pred.len() {
            return Err(TrainerError::Dataset(format!(
                "{} targets but {} predictions",
                y_true.len(),
                y_pred.len()
            )));
        }
        if y_true.is_empty() {
            return Err(TrainerError::Dataset("nothing to evaluate".to_string()));
        }

        let n = y_true.len() as f64;
        let mean = y_true.iter().sum::<f64>() / n;

        let (mut abs_sum, mut ss_res, mut ss_tot) = (0.0, 0.0, 0.0);
        for (&truth, &pred) in y_true.iter().zip(y_pred) {
            let err = truth - pred;
            abs_sum += err.abs();
            ss_res += err * err;
            ss_tot += (truth - mean) * (truth - mean);
        }

        let r2_score = if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        };
        let mse = ss_res / n;

        Ok(Self {
            r2_score,
            mean_absolute_error: abs_sum / n,
            mean_squared_error: mse,
            root_mean_squared_error: mse.sqrt(),
        })
    }
}

/// Evaluate stage: score the saved model on `X_test` / `y_test`
pub fn run(config: &PipelineConfig) -> Result<Metrics, TrainerError> {
    let test = DataPaths::in_dir(&config.paths.data_dir).load_test()?;
    let artifacts = ArtifactPaths::in_dir(&config.paths.models_dir);
    let model = ForestModel::load_json(&artifacts.model)?;

    if model.n_features != test.feature_count() {
        return Err(TrainerError::Dataset(format!(
            "model expects {} features, test set has {}",
            model.n_features,
            test.feature_count()
        )));
    }

    let predictions = model.predict_rows(test.features.iter_rows());
    let metrics = Metrics::compute(&test.targets, &predictions)?;

    let path = &config.paths.metrics_file;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TrainerError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(&metrics)
        .map_err(|e| TrainerError::Dataset(format!("failed to serialize metrics: {e}")))?;
    fs::write(path, json).map_err(|e| TrainerError::io(path, e))?;

    info!("Evaluation Metrics:");
    info!("  R² Score: {:.4}", metrics.r2_score);
    info!("  MAE: {:.2}", metrics.mean_absolute_error);
    info!("  RMSE: {:.2}", metrics.root_mean_squared_error);
    info!("Metrics saved to {}", path.display());

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_hand_computed() {
        let y_true = [3.0, -0.5, 2.0, 7.0];
        let y_pred = [2.5, 0.0, 2.0, 8.0];
        let metrics = Metrics::compute(&y_true, &y_pred).unwrap();

        // errors: 0.5, -0.5, 0, -1
        assert!((metrics.mean_absolute_error - 0.5).abs() < 1e-12);
        assert!((metrics.mean_squared_error - 0.375).abs() < 1e-12);
        assert!((metrics.root_mean_squared_error - 0.375f64.sqrt()).abs() < 1e-12);
        // ss_tot = 29.1875, ss_res = 1.5
        assert!((metrics.r2_score - (1.0 - 1.5 / 29.1875)).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_and_constant() {
        let perfect = Metrics::compute(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        assert_eq!(perfect.r2_score, 1.0);
        assert_eq!(perfect.mean_squared_error, 0.0);

        let constant = Metrics::compute(&[5.0, 5.0], &[4.0, 6.0]).unwrap();
        assert_eq!(constant.r2_score, 0.0);
        assert_eq!(constant.mean_absolute_error, 1.0);
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        assert!(Metrics::compute(&[1.0], &[1.0, 2.0]).is_err());
        assert!(Metrics::compute(&[], &[]).is_err());
    }

    #[test]
    fn test_metric_keys() {
        let metrics = Metrics::compute(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        let value = serde_json::to_value(&metrics).unwrap();
        for key in [
            "r2_score",
            "mean_absolute_error",
            "mean_squared_error",
            "root_mean_squared_error",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
