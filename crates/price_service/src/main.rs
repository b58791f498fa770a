//! housepk prediction server

use anyhow::Result;
use clap::Parser;
use housepk_service::{start_server, PredictionService, ServerConfig};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = ServerConfig::parse();
    info!("Starting housepk server v{}", env!("CARGO_PKG_VERSION"));

    let service = Arc::new(PredictionService::new(config.currency.clone()));
    match service.load(&config.artifact_paths()) {
        Ok(()) => info!("Model artifacts loaded from {}", config.models_dir.display()),
        Err(e) => {
            // Keep serving so /health can report the failure
            error!("Failed to load model artifacts: {}", e);
            error!("Run the training pipeline first: housepk-train repro");
        }
    }

    start_server(service, &config.bind_addr()).await
}

/// Initialize logging from `RUST_LOG`, defaulting to info
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
