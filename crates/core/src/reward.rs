//! Reward Integration Gateway contract.
//!
//! The cryptographic core produces a verdict about one listening session;
//! everything economic happens behind this boundary. The proof itself is
//! replayable by design, so the gateway, not the circuit, is responsible
//! for session uniqueness, and the circuit only proves *internal* time
//! consistency, so the gateway is also responsible for checking the claimed
//! session time against the wall clock before any reward is issued.
//!
//! Reward issuance itself (amounts, royalty splits, payout rails) is an
//! external collaborator and is only modeled here as the [`RewardGateway`]
//! trait.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::types::{ListenerId, SessionNonce, SongId};

/// Default wall-clock tolerance for a session's `current_time`, in seconds.
pub const DEFAULT_FRESHNESS_TOLERANCE_SECS: u64 = 300;

/// A session that passed cryptographic verification, in the form the
/// gateway consumes.
///
/// Field elements cross this boundary as decimal strings (the same
/// canonical form used on the JSON wire) so the gateway stays free of
/// curve types.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub song_id: SongId,
    pub listener_id: ListenerId,
    /// Nonce issued at session start; the unit of replay protection.
    pub nonce: SessionNonce,
    /// The circuit's `verified_song_hash` output.
    pub verified_song_hash: String,
    /// The `current_time` timestamp embedded in the proven statement.
    pub current_time: u64,
}

/// Errors produced while admitting a verified session for reward.
#[derive(Debug, Error)]
pub enum RewardError {
    /// The proof did not verify; nothing to admit.
    #[error("proof was rejected; session not admitted")]
    ProofRejected,

    /// This session nonce has already been consumed.
    #[error("session {nonce} already consumed")]
    ReplayedSession { nonce: String },

    /// The statement's `current_time` is too far from the wall clock.
    #[error("session time {session_time} outside tolerance {tolerance_secs}s of wall clock {wall_clock}")]
    StaleSession {
        session_time: u64,
        wall_clock: u64,
        tolerance_secs: u64,
    },

    /// Downstream issuance failure (external collaborator).
    #[error("reward issuance failed: {0}")]
    Issuance(String),
}

/// External collaborator that actually issues rewards.
///
/// Implementations live outside this repository; tests use simple mocks.
pub trait RewardGateway: Send + Sync {
    /// Issue the reward for an admitted session.
    fn issue_reward(&self, session: &VerifiedSession) -> Result<(), RewardError>;
}

/// Reference admission control for verified sessions.
///
/// Tracks consumed session nonces and enforces the freshness bound. This is
/// the piece the spec requires *outside* the cryptographic core: a valid
/// proof can be re-submitted verbatim, and only this registry prevents it
/// from being rewarded twice.
pub struct SessionRegistry {
    consumed: Mutex<HashSet<SessionNonce>>,
    freshness_tolerance_secs: u64,
}

impl SessionRegistry {
    pub fn new(freshness_tolerance_secs: u64) -> Self {
        Self {
            consumed: Mutex::new(HashSet::new()),
            freshness_tolerance_secs,
        }
    }

    /// Admit a session using the system wall clock.
    pub fn admit(&self, session: &VerifiedSession, proof_accepted: bool) -> Result<(), RewardError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.admit_at(session, proof_accepted, now)
    }

    /// Admit a session against an explicit wall-clock reading.
    ///
    /// On success the session nonce is consumed; a second call with the
    /// same nonce fails with [`RewardError::ReplayedSession`].
    pub fn admit_at(
        &self,
        session: &VerifiedSession,
        proof_accepted: bool,
        wall_clock: u64,
    ) -> Result<(), RewardError> {
        if !proof_accepted {
            return Err(RewardError::ProofRejected);
        }

        let drift = wall_clock.abs_diff(session.current_time);
        if drift > self.freshness_tolerance_secs {
            return Err(RewardError::StaleSession {
                session_time: session.current_time,
                wall_clock,
                tolerance_secs: self.freshness_tolerance_secs,
            });
        }

        let mut consumed = self.consumed.lock().expect("session registry poisoned");
        if !consumed.insert(session.nonce.clone()) {
            tracing::warn!(nonce = %session.nonce.to_hex(), "replayed session rejected");
            return Err(RewardError::ReplayedSession {
                nonce: session.nonce.to_hex(),
            });
        }

        tracing::debug!(
            song = %session.song_id,
            listener = %session.listener_id,
            "session admitted for reward"
        );
        Ok(())
    }

    /// Number of consumed sessions (observability).
    pub fn consumed_count(&self) -> usize {
        self.consumed.lock().expect("session registry poisoned").len()
    }
}
