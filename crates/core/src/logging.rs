//! Structured logging infrastructure for the Proof-of-Listen services.
//!
//! Centralized logging initialization with structured output and
//! environment-based filtering, shared by every binary in the workspace.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system with human-readable output.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level.
///
/// # Example
/// ```no_run
/// use vibestream_core::logging;
///
/// logging::init();
/// tracing::info!("proof service started");
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

/// Initialize the logging system with JSON output for production
/// environments and log aggregation.
///
/// # Example
/// ```no_run
/// use vibestream_core::logging;
///
/// logging::init_json();
/// tracing::info!(service = "zk-service", "service started");
/// ```
pub fn init_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_target(true))
        .init();
}
