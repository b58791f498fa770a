//! Stage ordering

use std::fmt;
use tracing::info;

use crate::config::PipelineConfig;
use crate::errors::TrainerError;
use crate::{evaluate, features, prepare, trainer};

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prepare,
    Features,
    Train,
    Evaluate,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Prepare, Stage::Features, Stage::Train, Stage::Evaluate];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Prepare => "prepare",
            Stage::Features => "features",
            Stage::Train => "train",
            Stage::Evaluate => "evaluate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run a single stage
pub fn run_stage(stage: Stage, config: &PipelineConfig) -> Result<(), TrainerError> {
    info!("Running stage: {}", stage);
    match stage {
        Stage::Prepare => {
            prepare::run(&config.prepare)?;
        }
        Stage::Features => {
            features::run(config)?;
        }
        Stage::Train => {
            trainer::run(config)?;
        }
        Stage::Evaluate => {
            evaluate::run(config)?;
        }
    }
    Ok(())
}

/// Run every stage in order
pub fn repro(config: &PipelineConfig) -> Result<(), TrainerError> {
    for stage in Stage::ALL {
        run_stage(stage, config)?;
    }
    Ok(())
}
