//! R1CS gadgets for the listen statement.
//!
//! The comparator here is the hardened replacement for free-floating
//! boolean hints: every comparison flag is the top bit of a constrained
//! bit decomposition, so a prover cannot assert a flag that disagrees with
//! the numeric relation; the witness simply has no satisfying assignment.

use ark_bn254::Fr;
use ark_ec::twisted_edwards::TECurveConfig;
use ark_ec::AffineRepr;
use ark_ed_on_bn254::{EdwardsAffine, EdwardsConfig};
use ark_ff::{BigInteger, Field, One, PrimeField, Zero};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use crate::challenge::{self, FULL_ROUNDS, PARTIAL_ROUNDS, WIDTH};
use crate::sig::SESSION_SCALAR_BITS;

type FrVar = FpVar<Fr>;

/// Allocate the `n_bits` little-endian bit decomposition of `value` as
/// boolean witnesses and constrain the weighted sum to equal `value`.
///
/// A value that does not fit in `n_bits` bits has no satisfying
/// decomposition.
pub(crate) fn decompose_bits(
    cs: ConstraintSystemRef<Fr>,
    value: &FrVar,
    n_bits: usize,
) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    let mut bits = Vec::with_capacity(n_bits);
    for i in 0..n_bits {
        let bit = Boolean::new_witness(cs.clone(), || {
            Ok(value.value()?.into_bigint().get_bit(i))
        })?;
        bits.push(bit);
    }

    let mut sum = FrVar::zero();
    let mut coeff = Fr::one();
    for bit in &bits {
        sum += FrVar::from(bit.clone()) * FrVar::constant(coeff);
        coeff = coeff + coeff;
    }
    sum.enforce_equal(value)?;

    Ok(bits)
}

/// Comparison flag `a <= b` for operands already bounded by `2^n_bits`.
///
/// `b - a + 2^n_bits` lies strictly inside `(0, 2^(n_bits + 1))` for
/// bounded operands, so its `(n_bits + 1)`-bit decomposition exists for
/// both orderings and the top bit equals the comparison.
pub(crate) fn leq_flag(
    cs: ConstraintSystemRef<Fr>,
    a: &FrVar,
    b: &FrVar,
    n_bits: usize,
) -> Result<Boolean<Fr>, SynthesisError> {
    let offset = FrVar::constant(pow2(n_bits));
    let shifted = b - a + offset;
    let bits = decompose_bits(cs, &shifted, n_bits + 1)?;
    Ok(bits[n_bits].clone())
}

fn pow2(exponent: usize) -> Fr {
    Fr::from(2u64).pow([exponent as u64])
}

/// A twisted-Edwards point as a coordinate pair of field variables. Not
/// range- or curve-checked; the signature flag tolerates garbage
/// coordinates by evaluating to zero.
#[derive(Clone)]
pub(crate) struct TePointVar {
    pub x: FrVar,
    pub y: FrVar,
}

impl TePointVar {
    pub fn identity() -> Self {
        Self {
            x: FrVar::constant(Fr::zero()),
            y: FrVar::constant(Fr::one()),
        }
    }

    pub fn constant(point: EdwardsAffine) -> Self {
        Self {
            x: FrVar::constant(point.x),
            y: FrVar::constant(point.y),
        }
    }
}

/// Complete twisted-Edwards addition. The quotients are witnessed and
/// bound by multiplication constraints; witness assignment fails on a zero
/// denominator, which cannot occur for points on the curve.
pub(crate) fn te_add(
    cs: ConstraintSystemRef<Fr>,
    p: &TePointVar,
    q: &TePointVar,
) -> Result<TePointVar, SynthesisError> {
    let a = FrVar::constant(<EdwardsConfig as TECurveConfig>::COEFF_A);
    let d = FrVar::constant(<EdwardsConfig as TECurveConfig>::COEFF_D);

    let x1x2 = &p.x * &q.x;
    let y1y2 = &p.y * &q.y;
    let x1y2 = &p.x * &q.y;
    let y1x2 = &p.y * &q.x;
    let dprod = &d * &(&x1x2 * &y1y2);

    let x_num = &x1y2 + &y1x2;
    let y_num = &y1y2 - &(&a * &x1x2);
    let x_den = FrVar::one() + &dprod;
    let y_den = FrVar::one() - &dprod;

    let x3 = FrVar::new_witness(cs.clone(), || {
        let inverse = x_den
            .value()?
            .inverse()
            .ok_or(SynthesisError::DivisionByZero)?;
        Ok(x_num.value()? * inverse)
    })?;
    let y3 = FrVar::new_witness(cs, || {
        let inverse = y_den
            .value()?
            .inverse()
            .ok_or(SynthesisError::DivisionByZero)?;
        Ok(y_num.value()? * inverse)
    })?;

    (&x3 * &x_den).enforce_equal(&x_num)?;
    (&y3 * &y_den).enforce_equal(&y_num)?;

    Ok(TePointVar { x: x3, y: y3 })
}

/// Double-and-add scalar multiplication over little-endian scalar bits.
pub(crate) fn te_scalar_mul(
    cs: ConstraintSystemRef<Fr>,
    base: &TePointVar,
    bits: &[Boolean<Fr>],
) -> Result<TePointVar, SynthesisError> {
    let mut acc = TePointVar::identity();
    for bit in bits.iter().rev() {
        acc = te_add(cs.clone(), &acc, &acc)?;
        let with_base = te_add(cs.clone(), &acc, base)?;
        acc = TePointVar {
            x: FrVar::conditionally_select(bit, &with_base.x, &acc.x)?,
            y: FrVar::conditionally_select(bit, &with_base.y, &acc.y)?,
        };
    }
    Ok(acc)
}

fn sbox_var(x: &FrVar) -> Result<FrVar, SynthesisError> {
    let x2 = x.square()?;
    let x4 = x2.square()?;
    Ok(&x4 * x)
}

/// In-circuit evaluation of the challenge permutation; mirrors
/// [`challenge::challenge_hash`] constant-for-constant.
pub(crate) fn challenge_gadget(inputs: &[FrVar; WIDTH - 1]) -> Result<FrVar, SynthesisError> {
    let params = challenge::parameters();

    let mut state: Vec<FrVar> = Vec::with_capacity(WIDTH);
    state.push(FrVar::constant(Fr::zero()));
    state.extend(inputs.iter().cloned());

    for round in 0..(FULL_ROUNDS + PARTIAL_ROUNDS) {
        for (element, constant) in state.iter_mut().zip(&params.round_constants[round]) {
            *element += FrVar::constant(*constant);
        }

        if challenge::is_full_round(round) {
            for element in state.iter_mut() {
                *element = sbox_var(element)?;
            }
        } else {
            state[0] = sbox_var(&state[0])?;
        }

        let mut mixed = Vec::with_capacity(WIDTH);
        for row in &params.mds {
            let mut acc = FrVar::zero();
            for (entry, element) in row.iter().zip(&state) {
                acc += element * FrVar::constant(*entry);
            }
            mixed.push(acc);
        }
        state = mixed;
    }

    Ok(state[0].clone())
}

/// Signature-validity flag in {0, 1}: checks `s·B == R + c·pk` with
/// `c = Poseidon(R.x, R.y, pk.x, pk.y, message)`.
///
/// The challenge decomposition is not range-checked against the modulus;
/// an alternate 254-bit representation only changes the scalar actually
/// multiplied, which can turn a valid check invalid but never the reverse.
pub(crate) fn signature_flag(
    cs: ConstraintSystemRef<Fr>,
    pk: &TePointVar,
    message_hash: &FrVar,
    nonce_point: &TePointVar,
    response: &FrVar,
) -> Result<FrVar, SynthesisError> {
    let challenge = challenge_gadget(&[
        nonce_point.x.clone(),
        nonce_point.y.clone(),
        pk.x.clone(),
        pk.y.clone(),
        message_hash.clone(),
    ])?;
    let challenge_bits = decompose_bits(cs.clone(), &challenge, Fr::MODULUS_BIT_SIZE as usize)?;
    let response_bits = decompose_bits(cs.clone(), response, SESSION_SCALAR_BITS)?;

    let generator = TePointVar::constant(EdwardsAffine::generator());
    let lhs = te_scalar_mul(cs.clone(), &generator, &response_bits)?;
    let challenge_pk = te_scalar_mul(cs.clone(), pk, &challenge_bits)?;
    let rhs = te_add(cs, nonce_point, &challenge_pk)?;

    let x_ok = lhs.x.is_eq(&rhs.x)?;
    let y_ok = lhs.y.is_eq(&rhs.y)?;
    Ok(FrVar::from(x_ok) * FrVar::from(y_ok))
}
