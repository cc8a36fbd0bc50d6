//! Poseidon commitments for song identifiers and session messages.
//!
//! These are native-only hashes: their outputs enter the circuit as
//! ordinary signals (`song_hash`, `message_hash`), so they use the
//! circom-compatible `light-poseidon` implementation directly. The only
//! hash that must also be evaluated in-circuit is the signature challenge,
//! which lives in [`crate::challenge`].

use ark_bn254::Fr;
use ark_ff::PrimeField;
use light_poseidon::{Poseidon, PoseidonHasher};
use vibestream_core::SessionNonce;

use crate::error::GenerationError;

/// Bytes packed per field element when absorbing raw identifiers.
const LIMB_BYTES: usize = 31;

/// Maximum input width supported by the circom parameter set.
const MAX_INPUTS: usize = 12;

fn poseidon_hash(inputs: &[Fr]) -> Result<Fr, GenerationError> {
    let mut hasher = Poseidon::<Fr>::new_circom(inputs.len())
        .map_err(|err| GenerationError::MalformedInput(err.to_string()))?;
    hasher
        .hash(inputs)
        .map_err(|err| GenerationError::MalformedInput(err.to_string()))
}

/// Commit to an opaque song identifier as a single field element.
///
/// The identifier is packed into 31-byte big-endian limbs so every limb is
/// trivially in-field, then absorbed in one Poseidon call.
pub fn song_commitment(song_id: &[u8]) -> Result<Fr, GenerationError> {
    if song_id.is_empty() {
        return Err(GenerationError::MalformedInput(
            "song identifier must not be empty".to_string(),
        ));
    }

    let limbs: Vec<Fr> = song_id
        .chunks(LIMB_BYTES)
        .map(Fr::from_be_bytes_mod_order)
        .collect();
    if limbs.len() > MAX_INPUTS {
        return Err(GenerationError::MalformedInput(format!(
            "song identifier too long: {} bytes",
            song_id.len()
        )));
    }

    poseidon_hash(&limbs)
}

/// Session message hash binding the signature to its context: the song
/// commitment, the signed play window, and the per-session nonce.
pub fn session_message_hash(
    song_hash: Fr,
    start_time: u64,
    end_time: u64,
    nonce: &SessionNonce,
) -> Result<Fr, GenerationError> {
    poseidon_hash(&[
        song_hash,
        Fr::from(start_time),
        Fr::from(end_time),
        Fr::from_be_bytes_mod_order(&nonce.0),
    ])
}
