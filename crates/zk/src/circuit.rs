//! The listen statement: the fixed relation a valid session must satisfy.
//!
//! A witness satisfies the statement when every comparison flag and the
//! signature flag are correctly derived from the private session data and
//! the declared outputs match. The predicate itself
//!
//! ```text
//! valid = (start <= current <= end)
//!       * (start + min_listen <= current)
//!       * VerifySignature(sig, pk, message)
//! ```
//!
//! is *not* enforced to hold; it is computed, multiplied into the
//! `valid_playtime` output, and published. A session outside its window
//! yields a perfectly valid proof of an invalid session.

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use serde::{Deserialize, Serialize};

use crate::challenge::CHALLENGE_DOMAIN;
use crate::gadgets::{leq_flag, signature_flag, TePointVar};
use crate::inputs::{ListenSessionClaim, PublicStatement};
use crate::sig::SESSION_SCALAR_BITS;

/// Bit width of session timestamps.
pub const TIME_BITS: usize = 64;

/// Compiled-statement version; bumped whenever the relation changes.
pub const STATEMENT_VERSION: u32 = 1;

/// Default minimum play duration for a rewardable session, in seconds.
pub const DEFAULT_MIN_LISTEN_SECONDS: u64 = 30;

/// The tunable part of the statement. Everything here is baked into the
/// constraint system, so two configs with different values are different
/// statements with incompatible parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementConfig {
    pub min_listen_seconds: u64,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            min_listen_seconds: DEFAULT_MIN_LISTEN_SECONDS,
        }
    }
}

impl StatementConfig {
    /// Version hash of the compiled statement. Embedded alongside the
    /// proving and verification keys; a mismatch anywhere is a hard
    /// configuration error.
    pub fn statement_hash(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"vibestream.listen-proof.statement");
        hasher.update(&STATEMENT_VERSION.to_le_bytes());
        hasher.update(&self.min_listen_seconds.to_le_bytes());
        hasher.update(&(TIME_BITS as u64).to_le_bytes());
        hasher.update(&(SESSION_SCALAR_BITS as u64).to_le_bytes());
        hasher.update(CHALLENGE_DOMAIN);
        *hasher.finalize().as_bytes()
    }
}

/// The listen relation as an arkworks constraint synthesizer.
///
/// Assignment values are `None` during parameter setup and populated from
/// a claim when proving.
#[derive(Clone)]
pub struct ListenCircuit {
    pub config: StatementConfig,
    // Public statement, in declared signal order.
    pub verified_song_hash: Option<Fr>,
    pub valid_playtime: Option<Fr>,
    pub signer_public_key: Option<[Fr; 2]>,
    pub message_hash: Option<Fr>,
    // Private witness.
    pub start_time: Option<Fr>,
    pub current_time: Option<Fr>,
    pub end_time: Option<Fr>,
    pub song_hash: Option<Fr>,
    pub signature: Option<[Fr; 3]>,
}

impl ListenCircuit {
    /// Unassigned circuit used for parameter setup.
    pub fn blank(config: StatementConfig) -> Self {
        Self {
            config,
            verified_song_hash: None,
            valid_playtime: None,
            signer_public_key: None,
            message_hash: None,
            start_time: None,
            current_time: None,
            end_time: None,
            song_hash: None,
            signature: None,
        }
    }

    /// Fully assigned circuit for one claim and its expected statement.
    pub fn from_claim(
        claim: &ListenSessionClaim,
        statement: &PublicStatement,
        config: StatementConfig,
    ) -> Self {
        Self {
            config,
            verified_song_hash: Some(statement.verified_song_hash),
            valid_playtime: Some(statement.valid_playtime),
            signer_public_key: Some(statement.signer_public_key),
            message_hash: Some(statement.message_hash),
            start_time: Some(Fr::from(claim.start_time)),
            current_time: Some(Fr::from(claim.current_time)),
            end_time: Some(Fr::from(claim.end_time)),
            song_hash: Some(claim.song_hash),
            signature: Some(claim.signature),
        }
    }
}

impl ConstraintSynthesizer<Fr> for ListenCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // Instance variables, allocated in the declared signal order.
        let verified_song_hash = FpVar::new_input(cs.clone(), || {
            self.verified_song_hash
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let valid_playtime = FpVar::new_input(cs.clone(), || {
            self.valid_playtime.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let pk_x = FpVar::new_input(cs.clone(), || {
            self.signer_public_key
                .map(|pk| pk[0])
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let pk_y = FpVar::new_input(cs.clone(), || {
            self.signer_public_key
                .map(|pk| pk[1])
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let message_hash = FpVar::new_input(cs.clone(), || {
            self.message_hash.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // Witness variables.
        let start_time = FpVar::new_witness(cs.clone(), || {
            self.start_time.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let current_time = FpVar::new_witness(cs.clone(), || {
            self.current_time.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let end_time = FpVar::new_witness(cs.clone(), || {
            self.end_time.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let song_hash = FpVar::new_witness(cs.clone(), || {
            self.song_hash.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let nonce_x = FpVar::new_witness(cs.clone(), || {
            self.signature
                .map(|sig| sig[0])
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let nonce_y = FpVar::new_witness(cs.clone(), || {
            self.signature
                .map(|sig| sig[1])
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let response = FpVar::new_witness(cs.clone(), || {
            self.signature
                .map(|sig| sig[2])
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        // Time-range flags via the bound comparator.
        let after_start = leq_flag(cs.clone(), &start_time, &current_time, TIME_BITS)?;
        let before_end = leq_flag(cs.clone(), &current_time, &end_time, TIME_BITS)?;
        // start + min_listen can exceed 64 bits, so this comparison runs one
        // bit wider.
        let earliest_valid =
            &start_time + FpVar::constant(Fr::from(self.config.min_listen_seconds));
        let long_enough = leq_flag(cs.clone(), &earliest_valid, &current_time, TIME_BITS + 1)?;

        let pk = TePointVar { x: pk_x, y: pk_y };
        let nonce_point = TePointVar {
            x: nonce_x,
            y: nonce_y,
        };
        let signature_ok = signature_flag(cs, &pk, &message_hash, &nonce_point, &response)?;

        // Hints combine multiplicatively: every factor is boolean, so the
        // product is one exactly when the whole predicate holds.
        let playtime = FpVar::from(after_start) * FpVar::from(before_end)
            * FpVar::from(long_enough)
            * signature_ok;

        valid_playtime.enforce_equal(&playtime)?;
        verified_song_hash.enforce_equal(&song_hash)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poseidon::{session_message_hash, song_commitment};
    use crate::sig::SigningKey;
    use ark_ff::{One, Zero};
    use ark_relations::r1cs::ConstraintSystem;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use vibestream_core::SessionNonce;

    fn test_config() -> StatementConfig {
        StatementConfig {
            min_listen_seconds: 10,
        }
    }

    fn signed_claim(start: u64, current: u64, end: u64) -> ListenSessionClaim {
        let mut rng = StdRng::seed_from_u64(4242);
        let sk = SigningKey::generate(&mut rng);
        let song_hash = song_commitment(b"song-circuit-test").unwrap();
        let message_hash =
            session_message_hash(song_hash, start, end, &SessionNonce([9u8; 16])).unwrap();
        let signature = sk.sign(message_hash);

        ListenSessionClaim {
            song_hash,
            start_time: start,
            current_time: current,
            end_time: end,
            signature: signature.to_elements(),
            signer_public_key: sk.verifying_key().to_elements(),
            message_hash,
        }
    }

    fn statement_for(claim: &ListenSessionClaim, valid: bool) -> PublicStatement {
        PublicStatement {
            verified_song_hash: claim.song_hash,
            valid_playtime: if valid { Fr::one() } else { Fr::zero() },
            signer_public_key: claim.signer_public_key,
            message_hash: claim.message_hash,
        }
    }

    fn is_satisfied(circuit: ListenCircuit) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn honest_session_inside_window_satisfies_with_valid_output() {
        let claim = signed_claim(10, 20, 30);
        let circuit = ListenCircuit::from_claim(&claim, &statement_for(&claim, true), test_config());
        assert!(is_satisfied(circuit));
    }

    #[test]
    fn session_before_window_satisfies_with_invalid_output() {
        let claim = signed_claim(10, 5, 30);
        let circuit =
            ListenCircuit::from_claim(&claim, &statement_for(&claim, false), test_config());
        assert!(is_satisfied(circuit));
    }

    #[test]
    fn session_after_window_satisfies_with_invalid_output() {
        let claim = signed_claim(10, 31, 30);
        let circuit =
            ListenCircuit::from_claim(&claim, &statement_for(&claim, false), test_config());
        assert!(is_satisfied(circuit));
    }

    #[test]
    fn short_session_satisfies_with_invalid_output() {
        // Inside the window but under min_listen_seconds.
        let claim = signed_claim(10, 15, 30);
        let circuit =
            ListenCircuit::from_claim(&claim, &statement_for(&claim, false), test_config());
        assert!(is_satisfied(circuit));
    }

    #[test]
    fn out_of_window_session_cannot_claim_valid_playtime() {
        // The adversarial direction: current_time < start_time but the
        // public output asserts validity.
        let claim = signed_claim(10, 5, 30);
        let circuit = ListenCircuit::from_claim(&claim, &statement_for(&claim, true), test_config());
        assert!(!is_satisfied(circuit));
    }

    #[test]
    fn tampered_signature_flips_the_output() {
        let mut claim = signed_claim(10, 20, 30);
        claim.signature[2] += Fr::one();

        // Honest output for a bad signature is zero...
        let circuit =
            ListenCircuit::from_claim(&claim, &statement_for(&claim, false), test_config());
        assert!(is_satisfied(circuit.clone()));

        // ...and claiming one is unsatisfiable.
        let circuit = ListenCircuit::from_claim(&claim, &statement_for(&claim, true), test_config());
        assert!(!is_satisfied(circuit));
    }

    #[test]
    fn song_hash_binding_is_enforced() {
        let claim = signed_claim(10, 20, 30);
        let mut statement = statement_for(&claim, true);
        statement.verified_song_hash += Fr::one();

        let circuit = ListenCircuit::from_claim(&claim, &statement, test_config());
        assert!(!is_satisfied(circuit));
    }

    #[test]
    fn statement_hash_tracks_the_config() {
        let a = StatementConfig {
            min_listen_seconds: 10,
        };
        let b = StatementConfig {
            min_listen_seconds: 30,
        };
        assert_ne!(a.statement_hash(), b.statement_hash());
        assert_eq!(a.statement_hash(), a.statement_hash());
    }
}
