//! Health report for the `/health` endpoint

use serde::{Deserialize, Serialize};

/// Health status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub model_loaded: bool,
    pub encoders_loaded: bool,
    pub features_loaded: bool,
    pub version: String,
}

impl HealthReport {
    /// Report for a service that has or has not published its artifacts.
    ///
    /// Artifacts are published together, so the three flags always agree.
    pub fn new(ready: bool) -> Self {
        Self {
            status: if ready {
                HealthStatus::Healthy
            } else {
                HealthStatus::Unhealthy
            },
            model_loaded: ready,
            encoders_loaded: ready,
            features_loaded: ready,
            version: crate::VERSION.to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        let value = serde_json::to_value(HealthReport::new(false)).unwrap();
        assert_eq!(value["status"], "unhealthy");
        assert_eq!(value["model_loaded"], false);

        let value = serde_json::to_value(HealthReport::new(true)).unwrap();
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["features_loaded"], true);
    }
}
