//! Operational counters for the proof service.
//!
//! Not part of the cryptographic contract: counts and rolling average
//! timings for the `/stats` endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::messages::StatsResponse;

#[derive(Default)]
pub struct ServiceStats {
    proofs_generated: AtomicU64,
    proofs_verified: AtomicU64,
    proofs_failed: AtomicU64,
    generation_micros: AtomicU64,
    verification_micros: AtomicU64,
}

impl ServiceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_generation(&self, elapsed: Duration) {
        self.proofs_generated.fetch_add(1, Ordering::Relaxed);
        self.generation_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_verification(&self, elapsed: Duration) {
        self.proofs_verified.fetch_add(1, Ordering::Relaxed);
        self.verification_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.proofs_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsResponse {
        let generated = self.proofs_generated.load(Ordering::Relaxed);
        let verified = self.proofs_verified.load(Ordering::Relaxed);

        StatsResponse {
            proofs_generated: generated,
            proofs_verified: verified,
            proofs_failed: self.proofs_failed.load(Ordering::Relaxed),
            avg_generation_ms: average_ms(self.generation_micros.load(Ordering::Relaxed), generated),
            avg_verification_ms: average_ms(
                self.verification_micros.load(Ordering::Relaxed),
                verified,
            ),
        }
    }
}

fn average_ms(total_micros: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total_micros as f64 / count as f64 / 1000.0
    }
}
