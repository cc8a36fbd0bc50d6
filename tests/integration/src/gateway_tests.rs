//! Reward-gateway admission on top of verified sessions: the uniqueness
//! and freshness rules the cryptographic core deliberately does not own.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::test_utils::*;
use vibestream_core::{
    ListenerId, RewardError, RewardGateway, SessionRegistry, SongId, VerifiedSession,
};
use vibestream_zk::{field_to_decimal, PublicStatement};

struct CountingGateway {
    issued: AtomicUsize,
}

impl RewardGateway for CountingGateway {
    fn issue_reward(&self, _session: &VerifiedSession) -> Result<(), RewardError> {
        self.issued.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn verified_session(fixture: &SessionFixture, statement: &PublicStatement) -> VerifiedSession {
    VerifiedSession {
        song_id: SongId("song-gateway".into()),
        listener_id: ListenerId("listener-gateway".into()),
        nonce: fixture.nonce.clone(),
        verified_song_hash: field_to_decimal(&statement.verified_song_hash),
        current_time: 1_000_020,
    }
}

#[test]
fn verified_session_is_admitted_once_and_rewarded() {
    let fixture = SessionFixture::new(30, b"song-gateway");
    let claim = fixture.claim(1_000_010, 1_000_020, 1_000_030);

    let artifact = shared_prover().generate(&claim).unwrap();
    let verdict = shared_verifier().verify(&artifact).unwrap();
    let statement = PublicStatement::from_signals(&artifact.public_signals).unwrap();

    let registry = SessionRegistry::new(300);
    let gateway = CountingGateway {
        issued: AtomicUsize::new(0),
    };
    let session = verified_session(&fixture, &statement);

    registry
        .admit_at(&session, verdict.is_accepted(), 1_000_050)
        .unwrap();
    gateway.issue_reward(&session).unwrap();
    assert_eq!(gateway.issued.load(Ordering::SeqCst), 1);

    // The same proof verifies again; replay is stopped here, not by the
    // cryptographic core.
    assert!(shared_verifier().verify(&artifact).unwrap().is_accepted());
    let replay = registry.admit_at(&session, true, 1_000_060);
    assert!(matches!(replay, Err(RewardError::ReplayedSession { .. })));
    assert_eq!(gateway.issued.load(Ordering::SeqCst), 1);
}

#[test]
fn stale_session_is_not_admitted_even_with_a_valid_proof() {
    let fixture = SessionFixture::new(31, b"song-gateway-stale");
    let claim = fixture.claim(1_000_010, 1_000_020, 1_000_030);

    let artifact = shared_prover().generate(&claim).unwrap();
    let verdict = shared_verifier().verify(&artifact).unwrap();
    let statement = PublicStatement::from_signals(&artifact.public_signals).unwrap();

    let registry = SessionRegistry::new(300);
    let session = verified_session(&fixture, &statement);

    // The circuit only proves internal consistency; wall-clock proximity
    // is enforced here.
    let result = registry.admit_at(&session, verdict.is_accepted(), 2_000_000);
    assert!(matches!(result, Err(RewardError::StaleSession { .. })));
}

#[test]
fn rejected_proof_never_reaches_admission() {
    let registry = SessionRegistry::new(300);
    let fixture = SessionFixture::new(32, b"song-gateway-rejected");
    let session = VerifiedSession {
        song_id: SongId("song-gateway-rejected".into()),
        listener_id: ListenerId("listener".into()),
        nonce: fixture.nonce.clone(),
        verified_song_hash: "0".into(),
        current_time: 1_000_000,
    };

    let result = registry.admit_at(&session, false, 1_000_000);
    assert!(matches!(result, Err(RewardError::ProofRejected)));
}
