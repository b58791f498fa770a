//! housepk trainer - offline pipeline for the house price model
//!
//! Four stages, each reading the previous stage's files:
//! clean (`prepare`), feature engineering (`features`), random forest
//! training (`trainer`) and held-out evaluation (`evaluate`).

pub mod cart;
pub mod config;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod evaluate;
pub mod features;
pub mod pipeline;
pub mod prepare;
pub mod table;
pub mod trainer;

pub use config::{ConfigError, PipelineConfig};
pub use dataset::{DataPaths, Dataset, Matrix};
pub use deterministic::{LcgRng, SplitTieBreaker};
pub use errors::TrainerError;
pub use evaluate::Metrics;
pub use pipeline::{repro, run_stage, Stage};
pub use trainer::{ForestTrainer, TrainingParams};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
