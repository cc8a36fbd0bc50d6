//! Poseidon permutation for the signature challenge.
//!
//! The challenge hash is the one hash that must evaluate to the same value
//! natively (when signing and when the prover fills the witness) and inside
//! the constraint system. To keep both evaluations tied to a single source
//! of truth, the permutation constants live here and both the native
//! evaluation (this module) and the circuit evaluation
//! (`gadgets::challenge_gadget`) consume them.
//!
//! Round constants are expanded from a BLAKE3 XOF under a fixed domain tag;
//! the MDS matrix is a Cauchy matrix over sampled points, which is
//! invertible whenever the sample points are pairwise distinct. The
//! sampling is deterministic, so every build of this crate agrees on the
//! statement.

use ark_bn254::Fr;
use ark_ff::{Field, PrimeField, Zero};
use std::sync::OnceLock;

/// Permutation width: one capacity element plus five challenge inputs
/// (R.x, R.y, pk.x, pk.y, message hash).
pub(crate) const WIDTH: usize = 6;
pub(crate) const FULL_ROUNDS: usize = 8;
pub(crate) const PARTIAL_ROUNDS: usize = 60;
pub(crate) const ROUNDS: usize = FULL_ROUNDS + PARTIAL_ROUNDS;

/// Domain tag binding the constants to this statement family. Changing it
/// changes the statement hash and therefore invalidates existing parameters.
pub(crate) const CHALLENGE_DOMAIN: &[u8] = b"vibestream.listen-proof.challenge.v1";

pub(crate) struct ChallengeParameters {
    pub round_constants: Vec<[Fr; WIDTH]>,
    pub mds: [[Fr; WIDTH]; WIDTH],
}

/// Rounds [0, FULL/2) and [FULL/2 + PARTIAL, ROUNDS) apply the S-box to the
/// whole state; the middle rounds only to the first element.
pub(crate) fn is_full_round(round: usize) -> bool {
    round < FULL_ROUNDS / 2 || round >= FULL_ROUNDS / 2 + PARTIAL_ROUNDS
}

fn field_stream(label: &str) -> impl FnMut() -> Fr {
    let mut hasher = blake3::Hasher::new();
    hasher.update(CHALLENGE_DOMAIN);
    hasher.update(label.as_bytes());
    let mut reader = hasher.finalize_xof();
    move || {
        let mut buf = [0u8; 48];
        reader.fill(&mut buf);
        Fr::from_be_bytes_mod_order(&buf)
    }
}

/// Cauchy construction: mds[i][j] = 1 / (x_i + y_j). Requires the x values
/// pairwise distinct, the y values pairwise distinct, and every x_i + y_j
/// nonzero; returns None so the caller can resample otherwise.
fn cauchy_matrix(xs: &[Fr; WIDTH], ys: &[Fr; WIDTH]) -> Option<[[Fr; WIDTH]; WIDTH]> {
    for i in 0..WIDTH {
        for j in (i + 1)..WIDTH {
            if xs[i] == xs[j] || ys[i] == ys[j] {
                return None;
            }
        }
    }

    let mut mds = [[Fr::zero(); WIDTH]; WIDTH];
    for i in 0..WIDTH {
        for j in 0..WIDTH {
            mds[i][j] = (xs[i] + ys[j]).inverse()?;
        }
    }
    Some(mds)
}

impl ChallengeParameters {
    fn derive() -> Self {
        let mut next_constant = field_stream("round-constants");
        let round_constants = (0..ROUNDS)
            .map(|_| std::array::from_fn(|_| next_constant()))
            .collect();

        let mut next_point = field_stream("mds-points");
        let mds = loop {
            let xs: [Fr; WIDTH] = std::array::from_fn(|_| next_point());
            let ys: [Fr; WIDTH] = std::array::from_fn(|_| next_point());
            if let Some(mds) = cauchy_matrix(&xs, &ys) {
                break mds;
            }
        };

        Self {
            round_constants,
            mds,
        }
    }
}

pub(crate) fn parameters() -> &'static ChallengeParameters {
    static PARAMETERS: OnceLock<ChallengeParameters> = OnceLock::new();
    PARAMETERS.get_or_init(ChallengeParameters::derive)
}

fn sbox(x: Fr) -> Fr {
    let x2 = x.square();
    let x4 = x2.square();
    x4 * x
}

/// Native evaluation of the challenge hash over five inputs.
pub fn challenge_hash(inputs: &[Fr; WIDTH - 1]) -> Fr {
    let params = parameters();

    let mut state = [Fr::zero(); WIDTH];
    state[1..].copy_from_slice(inputs);

    for round in 0..ROUNDS {
        for (element, constant) in state.iter_mut().zip(&params.round_constants[round]) {
            *element += constant;
        }

        if is_full_round(round) {
            for element in state.iter_mut() {
                *element = sbox(*element);
            }
        } else {
            state[0] = sbox(state[0]);
        }

        let mut mixed = [Fr::zero(); WIDTH];
        for i in 0..WIDTH {
            for j in 0..WIDTH {
                mixed[i] += params.mds[i][j] * state[j];
            }
        }
        state = mixed;
    }

    state[0]
}
