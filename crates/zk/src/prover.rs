//! Witness & proof generation service.
//!
//! Stateless per call: the claim is evaluated natively to fill every hint
//! signal and derive the declared outputs, the constraint system is checked
//! for satisfiability, and only then is the Groth16 prover run. Nothing
//! about the claim is persisted; a generation call may be abandoned
//! mid-computation without leaving partial state behind.

use std::sync::Arc;
use std::time::Instant;

use ark_bn254::{Bn254, Fr};
use ark_ff::{One, Zero};
use ark_groth16::Groth16;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_snark::SNARK;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::circuit::{ListenCircuit, StatementConfig};
use crate::error::GenerationError;
use crate::inputs::{ListenSessionClaim, ProofArtifact, PublicStatement};
use crate::params::ProvingParameters;
use crate::sig;

/// Proof generator bound to one statement and its proving parameters.
///
/// Parameters are passed in explicitly (there is no global key registry)
/// and the statement hash pairing is checked once at construction.
pub struct ListenProver {
    params: Arc<ProvingParameters>,
    config: StatementConfig,
}

impl ListenProver {
    pub fn new(
        params: Arc<ProvingParameters>,
        config: StatementConfig,
    ) -> Result<Self, GenerationError> {
        let compiled = config.statement_hash();
        if params.statement_hash != compiled {
            return Err(GenerationError::ParameterMismatch {
                expected: hex::encode(params.statement_hash),
                actual: hex::encode(compiled),
            });
        }
        Ok(Self { params, config })
    }

    /// Evaluate the relation natively: real integer comparisons for the
    /// time flags and a circuit-exact signature check. This is the witness
    /// evaluation step; the resulting statement carries the outputs the
    /// circuit will be asked to expose.
    pub fn evaluate_statement(
        &self,
        claim: &ListenSessionClaim,
    ) -> Result<PublicStatement, GenerationError> {
        let after_start = claim.start_time <= claim.current_time;
        let before_end = claim.current_time <= claim.end_time;
        let long_enough = u128::from(claim.start_time) + u128::from(self.config.min_listen_seconds)
            <= u128::from(claim.current_time);

        // None means the constraint system has no satisfying assignment
        // for these signature elements (degenerate coordinates).
        let signature_ok =
            sig::formula_verify(claim.signer_public_key, claim.message_hash, claim.signature)
                .ok_or(GenerationError::UnsatisfiedConstraints)?;

        let valid = after_start && before_end && long_enough && signature_ok;
        Ok(PublicStatement {
            verified_song_hash: claim.song_hash,
            valid_playtime: if valid { Fr::one() } else { Fr::zero() },
            signer_public_key: claim.signer_public_key,
            message_hash: claim.message_hash,
        })
    }

    /// Generate a proof for one claim.
    ///
    /// On `Ok`, the proof is a valid Groth16 proof that the (undisclosed)
    /// witness satisfies the listen statement, with `public_signals` in the
    /// declared output order. A session that fails the predicate still
    /// generates successfully, with `valid_playtime = 0`.
    pub fn generate(&self, claim: &ListenSessionClaim) -> Result<ProofArtifact, GenerationError> {
        claim.validate()?;

        let statement = self.evaluate_statement(claim)?;
        let circuit = ListenCircuit::from_claim(claim, &statement, self.config.clone());

        // Constraint check before proving, so an inconsistent assignment
        // surfaces as its own error rather than a backend failure.
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit
            .clone()
            .generate_constraints(cs.clone())
            .map_err(|_| GenerationError::UnsatisfiedConstraints)?;
        if !cs
            .is_satisfied()
            .map_err(|err| GenerationError::Proving(err.to_string()))?
        {
            return Err(GenerationError::UnsatisfiedConstraints);
        }

        let started = Instant::now();
        let mut rng = StdRng::from_entropy();
        let proof = Groth16::<Bn254>::prove(&self.params.key, circuit, &mut rng)
            .map_err(|err| GenerationError::Proving(err.to_string()))?;

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            valid_playtime = statement.playtime_is_valid(),
            "proof generated"
        );

        Ok(ProofArtifact {
            proof,
            public_signals: statement.to_signals(),
        })
    }
}
