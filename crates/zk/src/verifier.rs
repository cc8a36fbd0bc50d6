//! Proof verification service.
//!
//! A constant-size pairing check against the prepared verification key.
//! Cryptographic rejection and signal-shape mismatches are verdicts, not
//! errors: the only error paths are structurally undecodable proofs and
//! parameter configuration faults.

use std::sync::Arc;

use ark_bn254::Bn254;
use ark_groth16::Groth16;
use ark_snark::SNARK;

use crate::circuit::StatementConfig;
use crate::error::VerifyError;
use crate::inputs::{ProofArtifact, ProofArtifactJson, PUBLIC_SIGNAL_COUNT};
use crate::params::VerificationParameters;

/// Why a structurally valid proof was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Wrong number of public signals for this statement.
    SignalCount { expected: usize, actual: usize },
    /// The pairing check failed: corrupted proof, tampered signals, or a
    /// proof generated against different parameters.
    PairingCheck,
}

/// Verification outcome. Rejection is data, not an exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// Stable diagnostic code for observability surfaces.
    pub fn diagnostic_code(&self) -> Option<&'static str> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(RejectReason::SignalCount { .. }) => Some("signal-count"),
            Verdict::Rejected(RejectReason::PairingCheck) => Some("pairing-check"),
        }
    }
}

/// Proof verifier bound to one statement and its verification parameters.
pub struct ListenVerifier {
    params: Arc<VerificationParameters>,
}

impl ListenVerifier {
    pub fn new(
        params: Arc<VerificationParameters>,
        config: &StatementConfig,
    ) -> Result<Self, VerifyError> {
        let compiled = config.statement_hash();
        if params.statement_hash != compiled {
            return Err(VerifyError::ParameterMismatch {
                expected: hex::encode(params.statement_hash),
                actual: hex::encode(compiled),
            });
        }
        Ok(Self { params })
    }

    /// Verify a decoded artifact. Deterministic: the same artifact against
    /// the same parameters always yields the same verdict.
    pub fn verify(&self, artifact: &ProofArtifact) -> Result<Verdict, VerifyError> {
        if artifact.public_signals.len() != PUBLIC_SIGNAL_COUNT {
            let verdict = Verdict::Rejected(RejectReason::SignalCount {
                expected: PUBLIC_SIGNAL_COUNT,
                actual: artifact.public_signals.len(),
            });
            tracing::debug!(code = verdict.diagnostic_code(), "proof rejected");
            return Ok(verdict);
        }

        let accepted = Groth16::<Bn254>::verify_with_processed_vk(
            &self.params.prepared,
            &artifact.public_signals,
            &artifact.proof,
        )
        .map_err(|err| VerifyError::MalformedProof(err.to_string()))?;

        let verdict = if accepted {
            Verdict::Accepted
        } else {
            Verdict::Rejected(RejectReason::PairingCheck)
        };
        tracing::debug!(accepted, "proof verified");
        Ok(verdict)
    }

    /// Decode a wire-form artifact and verify it. Undecodable material is
    /// [`VerifyError::MalformedProof`], distinct from cryptographic
    /// rejection.
    pub fn verify_json(&self, json: &ProofArtifactJson) -> Result<Verdict, VerifyError> {
        let artifact = ProofArtifact::from_json(json)?;
        self.verify(&artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{ListenSessionClaim, PublicStatement};
    use crate::poseidon::{session_message_hash, song_commitment};
    use crate::prover::ListenProver;
    use crate::sig::SigningKey;
    use crate::test_support::test_parameters;
    use ark_bn254::Fr;
    use ark_ff::One;
    use rand::SeedableRng;
    use vibestream_core::SessionNonce;

    fn prover_and_verifier() -> (ListenProver, ListenVerifier) {
        let params = test_parameters();
        let prover = ListenProver::new(params.proving.clone(), params.statement.clone()).unwrap();
        let verifier =
            ListenVerifier::new(params.verification.clone(), &params.statement).unwrap();
        (prover, verifier)
    }

    fn claim() -> ListenSessionClaim {
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let sk = SigningKey::generate(&mut rng);
        let song_hash = song_commitment(b"song-verifier").unwrap();
        let message_hash =
            session_message_hash(song_hash, 10, 30, &SessionNonce([5u8; 16])).unwrap();
        let signature = sk.sign(message_hash);

        ListenSessionClaim {
            song_hash,
            start_time: 10,
            current_time: 20,
            end_time: 30,
            signature: signature.to_elements(),
            signer_public_key: sk.verifying_key().to_elements(),
            message_hash,
        }
    }

    #[test]
    fn accepts_honest_proof_and_is_deterministic() {
        let (prover, verifier) = prover_and_verifier();
        let artifact = prover.generate(&claim()).unwrap();

        let statement = PublicStatement::from_signals(&artifact.public_signals).unwrap();
        assert!(statement.playtime_is_valid());

        assert!(verifier.verify(&artifact).unwrap().is_accepted());
        assert!(verifier.verify(&artifact).unwrap().is_accepted());
    }

    #[test]
    fn tampered_public_signals_are_rejected() {
        let (prover, verifier) = prover_and_verifier();
        let mut artifact = prover.generate(&claim()).unwrap();

        // Flip valid_playtime without regenerating the proof.
        artifact.public_signals[1] += Fr::one();
        let verdict = verifier.verify(&artifact).unwrap();
        assert_eq!(verdict, Verdict::Rejected(RejectReason::PairingCheck));
    }

    #[test]
    fn wrong_signal_count_is_a_verdict_not_an_error() {
        let (prover, verifier) = prover_and_verifier();
        let mut artifact = prover.generate(&claim()).unwrap();
        artifact.public_signals.pop();

        let verdict = verifier.verify(&artifact).unwrap();
        assert_eq!(verdict.diagnostic_code(), Some("signal-count"));
    }

    #[test]
    fn json_round_trip_preserves_the_verdict() {
        let (prover, verifier) = prover_and_verifier();
        let artifact = prover.generate(&claim()).unwrap();

        let verdict = verifier.verify_json(&artifact.to_json()).unwrap();
        assert!(verdict.is_accepted());
    }

    #[test]
    fn garbage_proof_bytes_are_malformed_not_rejected() {
        let (prover, verifier) = prover_and_verifier();
        let mut json = prover.generate(&claim()).unwrap().to_json();
        json.proof.pi_a = "00ff".into();

        assert!(matches!(
            verifier.verify_json(&json),
            Err(VerifyError::MalformedProof(_))
        ));
    }

    #[test]
    fn mismatched_statement_config_is_rejected_at_construction() {
        let params = test_parameters();
        let other = StatementConfig {
            min_listen_seconds: 999,
        };
        assert!(matches!(
            ListenVerifier::new(params.verification.clone(), &other),
            Err(VerifyError::ParameterMismatch { .. })
        ));
    }
}
