//! housepk prediction server
//!
//! Loads the trained forest, label encoders and feature schema once at
//! start-up and serves price predictions:
//! - `GET /` prediction form
//! - `POST /predict` form submission, HTML result
//! - `POST /api/predict` JSON in, JSON out
//! - `GET /health` artifact load status

pub mod catalog;
pub mod config;
pub mod errors;
pub mod health;
pub mod pages;
pub mod pricing;
pub mod server;
pub mod service;

pub use config::ServerConfig;
pub use errors::ServiceError;
pub use health::{HealthReport, HealthStatus};
pub use server::{build_router, start_server, SharedService};
pub use service::{Prediction, PredictionService};

/// Service version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
