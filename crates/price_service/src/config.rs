//! Server configuration: CLI flags with environment fallbacks

use clap::Parser;
use housepk_core::ArtifactPaths;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "housepk-server")]
#[command(about = "House price prediction server")]
#[command(version)]
pub struct ServerConfig {
    /// Bind address
    #[arg(long, env = "HOUSEPK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port
    #[arg(short, long, env = "HOUSEPK_PORT", default_value = "5000")]
    pub port: u16,

    /// Directory holding the trained model, encoders and feature schema
    #[arg(long, env = "HOUSEPK_MODELS_DIR", default_value = "models")]
    pub models_dir: PathBuf,

    /// Currency prefix for formatted prices
    #[arg(long, env = "HOUSEPK_CURRENCY", default_value = "PKR")]
    pub currency: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::in_dir(&self.models_dir)
    }
}
