//! Proof-of-Listen worker service.
//!
//! Thin HTTP surface over the `vibestream-zk` core: generate on blocking
//! workers, verify inline, plus health and operational stats. The JSON
//! contract lives in [`messages`].

pub mod config;
pub mod handlers;
pub mod messages;
pub mod state;
pub mod stats;

pub use config::Config;
pub use state::AppState;
