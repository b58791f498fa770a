//! Random forest trainer
//!
//! Each tree is fit on its own bootstrap sample, drawn from an RNG seeded
//! from `(random_state, tree index)`. Trees are built on the rayon pool and
//! collected in index order, so the forest is identical for any thread count.

use housepk_core::forest::{ForestMetadata, ForestModel, Tree};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::cart::{CartBuilder, TreeConfig};
use crate::config::{PipelineConfig, TrainConfig};
use crate::dataset::{DataPaths, Dataset};
use crate::deterministic::{tree_seed, LcgRng};
use crate::errors::TrainerError;
use housepk_core::ArtifactPaths;

/// Forest training configuration
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub random_state: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            random_state: 42,
        }
    }
}

impl From<&TrainConfig> for TrainingParams {
    fn from(config: &TrainConfig) -> Self {
        Self {
            n_estimators: config.n_estimators,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            random_state: config.random_state,
        }
    }
}

/// Random forest trainer
pub struct ForestTrainer {
    params: TrainingParams,
}

impl ForestTrainer {
    pub fn new(params: TrainingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    /// Train a forest on the given dataset
    pub fn train(&self, dataset: &Dataset) -> Result<ForestModel, TrainerError> {
        if dataset.is_empty() {
            return Err(TrainerError::Training("training set is empty".to_string()));
        }
        if dataset.feature_count() == 0 {
            return Err(TrainerError::Training("training set has no features".to_string()));
        }
        if self.params.n_estimators == 0 {
            return Err(TrainerError::Training(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        let tree_config = TreeConfig {
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
        };

        let trees: Vec<Tree> = (0..self.params.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = LcgRng::new(tree_seed(self.params.random_state, tree_idx));
                let sample = bootstrap_sample(dataset.len(), &mut rng);
                let builder =
                    CartBuilder::new(&dataset.features, &dataset.targets, tree_config.clone());
                let tree = builder.build(&sample);
                debug!(
                    tree = tree_idx,
                    nodes = tree.nodes.len(),
                    depth = tree.depth(),
                    "Tree built"
                );
                tree
            })
            .collect();

        let metadata = ForestMetadata {
            n_estimators: self.params.n_estimators,
            max_depth: self.params.max_depth,
            min_samples_split: self.params.min_samples_split,
            random_state: self.params.random_state,
            training_rows: dataset.len(),
        };

        let model = ForestModel::new(dataset.feature_count(), trees, metadata);
        model.validate()?;
        Ok(model)
    }
}

/// Draw `n` row indices with replacement
fn bootstrap_sample(n: usize, rng: &mut LcgRng) -> Vec<usize> {
    (0..n).map(|_| rng.next_index(n)).collect()
}

/// Summary of a train stage run
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub training_rows: usize,
    pub n_features: usize,
    pub n_trees: usize,
    pub model_hash: String,
}

/// Train stage: fit the forest on `X_train` / `y_train` and persist it
pub fn run(config: &PipelineConfig) -> Result<TrainReport, TrainerError> {
    let data = DataPaths::in_dir(&config.paths.data_dir);
    let dataset = data.load_train()?;
    info!(
        "Training with {} samples and {} features",
        dataset.len(),
        dataset.feature_count()
    );

    let params = TrainingParams::from(&config.train);
    info!("Training configuration:");
    info!("  Trees: {}", params.n_estimators);
    info!("  Max depth: {:?}", params.max_depth);
    info!("  Min samples split: {}", params.min_samples_split);
    info!("  Random state: {}", params.random_state);

    let model = ForestTrainer::new(params).train(&dataset)?;

    let artifacts = ArtifactPaths::in_dir(&config.paths.models_dir);
    let model_hash = model.save_json(&artifacts.model)?;
    std::fs::write(&artifacts.model_hash, &model_hash)
        .map_err(|e| TrainerError::io(&artifacts.model_hash, e))?;

    info!("Model saved to {}", artifacts.model.display());
    info!("  Hash: {} ({})", artifacts.model_hash.display(), model_hash);

    Ok(TrainReport {
        training_rows: dataset.len(),
        n_features: model.n_features,
        n_trees: model.num_trees(),
        model_hash,
    })
}
