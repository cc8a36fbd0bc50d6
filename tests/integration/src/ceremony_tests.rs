//! Ceremony properties that only show up end-to-end: replayability of the
//! toy ceremony and the binding between proofs and their parameter set.

use crate::test_utils::*;
use ark_serialize::CanonicalSerialize;
use vibestream_zk::{ListenProver, ListenVerifier};

fn vk_bytes(params: &vibestream_zk::ParameterSet) -> Vec<u8> {
    let mut bytes = Vec::new();
    params
        .verification
        .key
        .serialize_compressed(&mut bytes)
        .unwrap();
    bytes
}

#[test]
fn toy_ceremony_is_replayable() {
    // Same contribution chain, same parameters: the ceremony is a pure
    // function of its log.
    let first = toy_ceremony(&["alice", "bob"]);
    let second = toy_ceremony(&["alice", "bob"]);
    assert_eq!(vk_bytes(&first), vk_bytes(&second));
}

#[test]
fn different_entropy_yields_different_parameters() {
    let first = toy_ceremony(&["alice", "bob"]);
    let second = toy_ceremony(&["alice", "mallory"]);
    assert_ne!(vk_bytes(&first), vk_bytes(&second));
}

#[test]
fn proofs_bind_to_their_parameter_set() {
    let other = toy_ceremony(&["independent", "ceremony"]);
    let other_prover =
        ListenProver::new(other.proving.clone(), other.statement.clone()).unwrap();

    let fixture = SessionFixture::new(20, b"song-ceremony");
    let artifact = other_prover.generate(&fixture.claim(10, 20, 30)).unwrap();

    // Valid against its own ceremony's key...
    let own_verifier = ListenVerifier::new(other.verification.clone(), &other.statement).unwrap();
    assert!(own_verifier.verify(&artifact).unwrap().is_accepted());

    // ...and rejected against the shared ceremony's key.
    assert!(!shared_verifier().verify(&artifact).unwrap().is_accepted());
}
