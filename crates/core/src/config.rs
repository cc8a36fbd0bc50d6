//! Configuration management for the Proof-of-Listen services.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub artifacts: ArtifactConfig,
    pub gateway: GatewayConfig,
}

/// Settings for the proof service binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// TCP port the HTTP surface binds to.
    pub port: u16,
    /// Number of blocking worker threads reserved for proof generation.
    pub prover_workers: usize,
}

/// Where the ceremony output (statement descriptor + keys) lives on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    pub dir: String,
    /// Allow generating throwaway parameters at startup when the artifact
    /// directory is empty. Never enable outside development.
    pub dev_setup: bool,
}

/// Reward-gateway policy knobs enforced outside the cryptographic core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Maximum allowed distance between a statement's `current_time` and
    /// the gateway wall clock, in seconds.
    pub freshness_tolerance_secs: u64,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content).map_err(|e| CoreError::Config(e.to_string()))?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            service: ServiceConfig {
                port: 8004,
                prover_workers: 2,
            },
            artifacts: ArtifactConfig {
                dir: "artifacts".to_string(),
                dev_setup: false,
            },
            gateway: GatewayConfig {
                freshness_tolerance_secs: crate::reward::DEFAULT_FRESHNESS_TOLERANCE_SECS,
            },
        }
    }
}
