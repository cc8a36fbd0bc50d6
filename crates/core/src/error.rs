//! Core error types

use thiserror::Error;

/// Result alias used throughout the core crate
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for the Proof-of-Listen stack
#[derive(Debug, Error)]
pub enum CoreError {
    /// Generic error
    #[error("Core error: {0}")]
    Generic(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}
