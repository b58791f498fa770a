//! housepk pipeline CLI
//!
//! Runs the clean, feature, train and evaluate stages from `params.yaml`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use housepk_trainer::{repro, run_stage, PipelineConfig, Stage};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "housepk-train")]
#[command(author = "housepk Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "House price pipeline: clean, features, train, evaluate", long_about = None)]
struct Args {
    /// Pipeline parameters file
    #[arg(short, long, default_value = "params.yaml")]
    config: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean the raw listings CSV
    Prepare,
    /// Fit encoders, build the feature schema and split train/test
    Features,
    /// Fit the random forest
    Train,
    /// Score the model on the held-out split
    Evaluate,
    /// Run every stage in order
    Repro,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("housepk trainer v{}", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    let stage = match args.command {
        Command::Prepare => Some(Stage::Prepare),
        Command::Features => Some(Stage::Features),
        Command::Train => Some(Stage::Train),
        Command::Evaluate => Some(Stage::Evaluate),
        Command::Repro => None,
    };

    match stage {
        Some(stage) => {
            run_stage(stage, &config).with_context(|| format!("Stage {stage} failed"))?
        }
        None => repro(&config).context("Pipeline failed")?,
    }

    info!("Done");
    Ok(())
}
