//! Core functionality for the VibeStream Proof-of-Listen stack.
//!
//! This crate provides the shared types, configuration, logging, and the
//! reward-gateway contract used across the Proof-of-Listen workspace. The
//! cryptographic core itself lives in `vibestream-zk`; this crate is the
//! seam between that core and the rest of the platform.

pub mod config;
pub mod error;
pub mod logging;
pub mod reward;
pub mod types;

pub use config::{ArtifactConfig, Config, GatewayConfig, ServiceConfig};
pub use error::{CoreError, Result};
pub use reward::{
    RewardError, RewardGateway, SessionRegistry, VerifiedSession, DEFAULT_FRESHNESS_TOLERANCE_SECS,
};
pub use types::{ListenerId, SessionNonce, SongId};
