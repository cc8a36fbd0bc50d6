//! Error taxonomy for the Proof-of-Listen core.
//!
//! Two outcomes are deliberately *not* errors: a successfully generated
//! proof whose `valid_playtime` output is zero, and a verification verdict
//! of `Rejected`. Both are first-class protocol results and flow through
//! the success paths as data.

use thiserror::Error;

/// Errors surfaced by the witness & proof generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Input could not be canonicalized into the proving field or does not
    /// match the claim schema. Rejected before witness evaluation.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The supplied private data cannot be assigned consistently with the
    /// listen statement. No proof is emitted.
    #[error("witness does not satisfy the listen statement")]
    UnsatisfiedConstraints,

    /// The proving key was produced for a different compiled statement.
    #[error("parameter mismatch: proving key statement {expected}, compiled statement {actual}")]
    ParameterMismatch { expected: String, actual: String },

    /// Failure inside the proving backend.
    #[error("proving failed: {0}")]
    Proving(String),
}

/// Errors surfaced by the proof verification service.
///
/// Routine cryptographic rejection is *not* here; that is
/// [`Verdict::Rejected`](crate::verifier::Verdict). Only structurally
/// invalid material and configuration faults are.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The proof bytes do not decode into curve points.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// The verification key was produced for a different compiled statement.
    #[error("parameter mismatch: verification key statement {expected}, compiled statement {actual}")]
    ParameterMismatch { expected: String, actual: String },
}

/// Errors raised while running the parameter ceremony.
#[derive(Debug, Error)]
pub enum CeremonyError {
    /// A contribution failed validation and was not appended.
    #[error("contribution rejected: {0}")]
    InvalidContribution(String),

    /// The universal phase cannot accept contributions once
    /// circuit-specific specialization has begun.
    #[error("universal phase is closed once specialization has begun")]
    UniversalPhaseClosed,

    /// Specialization requires at least one universal contribution.
    #[error("universal phase has no contributions")]
    UniversalPhaseEmpty,

    /// Finalization requires at least one circuit-specific contribution.
    #[error("circuit-specific phase has no contributions")]
    SpecificPhaseEmpty,

    /// Replay of the transcript found a broken hash chain.
    #[error("transcript hash mismatch at step {index}")]
    TranscriptMismatch { index: usize },

    /// The Groth16 setup itself failed.
    #[error("parameter setup failed: {0}")]
    Setup(String),
}

/// Errors loading or storing the versioned parameter artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact encoding error: {0}")]
    Encoding(String),

    #[error("artifact malformed: {0}")]
    Malformed(String),

    /// The artifact was produced for a different compiled statement.
    /// Hard configuration error, never silently tolerated.
    #[error("artifact statement mismatch: expected {expected}, found {found}")]
    StatementMismatch { expected: String, found: String },
}
