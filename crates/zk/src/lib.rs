//! Proof-of-Listen cryptographic core for VibeStream.
//!
//! This crate lets a client prove that a specific song was played for at
//! least a minimum duration, inside a signed time window, by the holder of
//! a specific key, without revealing the signature or the timing
//! telemetry beyond the committed song identifier. Implements Groth16
//! proofs over the BN254 curve using arkworks.
//!
//! # Architecture
//!
//! ```text
//! CEREMONY (once):
//!   contributions → transcript chain → Groth16 setup → (proving key, verification key)
//!
//! PROVE (per session):
//!   ListenSessionClaim → witness evaluation → constraint check → proof + public signals
//!
//! VERIFY (per submission):
//!   (proof, public signals) → pairing check → Accepted / Rejected
//! ```
//!
//! # Protocol outcomes vs. errors
//!
//! A proof whose `valid_playtime` output is zero is a *successful*
//! generation: a valid proof of an invalid session. Only inconsistent
//! witness material, malformed inputs, and parameter mismatches are
//! errors. Verification likewise returns rejection as a verdict, never as
//! an error.

pub mod ceremony;
pub mod circuit;
pub mod error;
pub mod field;
pub mod inputs;
pub mod params;
pub mod poseidon;
pub mod prover;
pub mod sig;
pub mod verifier;

mod challenge;
mod gadgets;

pub use ceremony::{Ceremony, CeremonyTranscript, Contribution, ContributionSecret};
pub use circuit::{ListenCircuit, StatementConfig, DEFAULT_MIN_LISTEN_SECONDS, STATEMENT_VERSION};
pub use error::{ArtifactError, CeremonyError, GenerationError, VerifyError};
pub use field::{field_to_decimal, parse_field_element};
pub use inputs::{
    ListenSessionClaim, ProofArtifact, ProofArtifactJson, ProofJson, PublicStatement,
    PUBLIC_SIGNAL_COUNT,
};
pub use params::{ParameterSet, ProvingParameters, VerificationParameters};
pub use poseidon::{session_message_hash, song_commitment};
pub use prover::ListenProver;
pub use sig::{SessionSignature, SigningKey, VerifyingKey};
pub use verifier::{ListenVerifier, RejectReason, Verdict};
