//! Full prove → verify flows over the listen statement.

use crate::test_utils::*;
use ark_bn254::Fr;
use ark_ff::One;
use vibestream_zk::{PublicStatement, Verdict};

#[test]
fn valid_session_proves_and_verifies() {
    // start=10, current=20, end=30, min_listen=10: the concrete scenario.
    let fixture = SessionFixture::new(1, b"song-flow-1");
    let claim = fixture.claim(10, 20, 30);

    let artifact = shared_prover().generate(&claim).unwrap();
    let statement = PublicStatement::from_signals(&artifact.public_signals).unwrap();

    assert!(statement.playtime_is_valid());
    assert_eq!(statement.verified_song_hash, claim.song_hash);
    assert_eq!(statement.signer_public_key, claim.signer_public_key);
    assert_eq!(statement.message_hash, claim.message_hash);

    assert!(shared_verifier().verify(&artifact).unwrap().is_accepted());
}

#[test]
fn session_before_the_window_proves_with_invalid_playtime() {
    // Same window, current=5: a valid proof of an invalid session.
    let fixture = SessionFixture::new(2, b"song-flow-2");
    let claim = fixture.claim(10, 5, 30);

    let artifact = shared_prover().generate(&claim).unwrap();
    let statement = PublicStatement::from_signals(&artifact.public_signals).unwrap();

    assert!(!statement.playtime_is_valid());
    assert!(shared_verifier().verify(&artifact).unwrap().is_accepted());
}

#[test]
fn song_commitment_moves_in_lockstep_with_the_claim() {
    let fixture = SessionFixture::new(3, b"song-flow-3");
    let mut tampered = fixture.claim(10, 20, 30);
    // Flip the low bit of the committed song hash before generation.
    tampered.song_hash += Fr::one();
    // The message hash was computed over the original song hash, so the
    // signature no longer covers this session.
    let artifact = shared_prover().generate(&tampered).unwrap();
    let statement = PublicStatement::from_signals(&artifact.public_signals).unwrap();

    assert_eq!(statement.verified_song_hash, tampered.song_hash);
    assert!(!statement.playtime_is_valid());
}

#[test]
fn tampered_public_signals_fail_verification() {
    let fixture = SessionFixture::new(4, b"song-flow-4");
    let artifact = shared_prover().generate(&fixture.claim(10, 20, 30)).unwrap();

    let verifier = shared_verifier();
    for index in 0..artifact.public_signals.len() {
        let mut tampered = artifact.clone();
        tampered.public_signals[index] += Fr::one();
        assert!(
            !verifier.verify(&tampered).unwrap().is_accepted(),
            "tampered signal {index} was accepted"
        );
    }
}

#[test]
fn verification_is_deterministic() {
    let fixture = SessionFixture::new(5, b"song-flow-5");
    let artifact = shared_prover().generate(&fixture.claim(10, 20, 30)).unwrap();

    let verifier = shared_verifier();
    let first = verifier.verify(&artifact).unwrap();
    let second = verifier.verify(&artifact).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Verdict::Accepted);
}

#[test]
fn wire_format_round_trips_through_json() {
    let fixture = SessionFixture::new(6, b"song-flow-6");
    let artifact = shared_prover().generate(&fixture.claim(10, 20, 30)).unwrap();

    let wire = serde_json::to_string(&artifact.to_json()).unwrap();
    let decoded: vibestream_zk::ProofArtifactJson = serde_json::from_str(&wire).unwrap();

    // publicSignals order is the contract: outputs first.
    assert_eq!(decoded.public_signals[1], "1");
    assert_eq!(decoded.proof.protocol, "groth16");
    assert_eq!(decoded.proof.curve, "bn254");

    assert!(shared_verifier()
        .verify_json(&decoded)
        .unwrap()
        .is_accepted());
}
