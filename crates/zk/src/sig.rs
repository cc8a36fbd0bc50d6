//! Session signatures over the Baby Jubjub curve.
//!
//! A listening session is bound to a keyholder with a Schnorr-style
//! signature over the curve embedded in the proving field
//! (`ark-ed-on-bn254`), with a Poseidon challenge: the shape the circuit
//! can check without leaving field arithmetic. The client signs the session
//! message hash; the circuit re-derives the challenge and checks
//! `s·B == R + c·pk`.
//!
//! Two evaluation paths exist on purpose:
//!
//! * [`VerifyingKey::verify`] uses proper group arithmetic and is the
//!   reference check for native callers and tests.
//! * [`formula_verify`] mirrors the circuit gadget operation-for-operation
//!   (complete twisted-Edwards addition formulas over raw coordinate
//!   pairs), so the prover can predict the exact flag value the constraint
//!   system will produce, including for degenerate inputs that are not
//!   curve points at all.

use ark_bn254::Fr;
use ark_ec::twisted_edwards::TECurveConfig;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bn254::{EdwardsAffine, EdwardsConfig, EdwardsProjective, Fr as SessionScalar};
use ark_ff::{BigInteger, Field, One, PrimeField, UniformRand, Zero};

use crate::challenge::challenge_hash;

/// Width of the session-scalar bit decomposition in the circuit. The Baby
/// Jubjub subgroup order is below 2^251, so every honest response scalar
/// fits.
pub const SESSION_SCALAR_BITS: usize = 251;

const NONCE_DOMAIN: &[u8] = b"vibestream.listen-proof.nonce.v1";

/// Private signing key for listening sessions.
#[derive(Clone)]
pub struct SigningKey {
    secret: SessionScalar,
}

/// Public counterpart distributed to the proving side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyingKey {
    pub point: EdwardsAffine,
}

/// Schnorr signature: nonce point R and response scalar s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSignature {
    pub nonce_point: EdwardsAffine,
    pub response: SessionScalar,
}

fn mul(point: EdwardsAffine, scalar: SessionScalar) -> EdwardsAffine {
    (EdwardsProjective::from(point) * scalar).into_affine()
}

/// Embed a session scalar into the proving field.
pub(crate) fn scalar_to_base(scalar: SessionScalar) -> Fr {
    Fr::from_le_bytes_mod_order(&scalar.into_bigint().to_bytes_le())
}

/// Reduce a proving-field element into the session scalar field.
fn base_to_scalar(value: Fr) -> SessionScalar {
    SessionScalar::from_le_bytes_mod_order(&value.into_bigint().to_bytes_le())
}

/// Challenge scalar for (R, pk, message). The Poseidon output is a
/// proving-field element; scalar multiplication by its integer value and by
/// its reduction mod the subgroup order agree on subgroup points, which is
/// what keeps this consistent with the bitwise multiplication in-circuit.
fn challenge_scalar(nonce_point: &EdwardsAffine, pk: &EdwardsAffine, message_hash: Fr) -> SessionScalar {
    let c = challenge_hash(&[nonce_point.x, nonce_point.y, pk.x, pk.y, message_hash]);
    base_to_scalar(c)
}

impl SigningKey {
    pub fn generate<R: rand::Rng + rand::CryptoRng>(rng: &mut R) -> Self {
        Self {
            secret: SessionScalar::rand(rng),
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            point: mul(EdwardsAffine::generator(), self.secret),
        }
    }

    /// Sign a session message hash with a deterministic nonce derived from
    /// the secret and the message.
    pub fn sign(&self, message_hash: Fr) -> SessionSignature {
        let mut hasher = blake3::Hasher::new();
        hasher.update(NONCE_DOMAIN);
        hasher.update(&self.secret.into_bigint().to_bytes_le());
        hasher.update(&message_hash.into_bigint().to_bytes_le());
        let mut reader = hasher.finalize_xof();
        let mut wide = [0u8; 64];
        reader.fill(&mut wide);
        let nonce = SessionScalar::from_le_bytes_mod_order(&wide);

        let nonce_point = mul(EdwardsAffine::generator(), nonce);
        let challenge = challenge_scalar(&nonce_point, &self.verifying_key().point, message_hash);

        SessionSignature {
            nonce_point,
            response: nonce + challenge * self.secret,
        }
    }
}

impl VerifyingKey {
    /// Reference verification via group arithmetic.
    pub fn verify(&self, message_hash: Fr, signature: &SessionSignature) -> bool {
        let challenge = challenge_scalar(&signature.nonce_point, &self.point, message_hash);
        let lhs = mul(EdwardsAffine::generator(), signature.response);
        let rhs = (EdwardsProjective::from(signature.nonce_point)
            + EdwardsProjective::from(self.point) * challenge)
            .into_affine();
        lhs == rhs
    }

    /// Coordinate form used in claims and public signals.
    pub fn to_elements(&self) -> [Fr; 2] {
        [self.point.x, self.point.y]
    }
}

impl SessionSignature {
    /// Field-element triple `[R.x, R.y, s]` used in claims.
    pub fn to_elements(&self) -> [Fr; 3] {
        [
            self.nonce_point.x,
            self.nonce_point.y,
            scalar_to_base(self.response),
        ]
    }
}

/// Complete twisted-Edwards addition over raw coordinate pairs. Returns
/// None when a denominator vanishes, the same situation in which the
/// circuit's division witness cannot be assigned.
pub(crate) fn formula_add(p: (Fr, Fr), q: (Fr, Fr)) -> Option<(Fr, Fr)> {
    let a = <EdwardsConfig as TECurveConfig>::COEFF_A;
    let d = <EdwardsConfig as TECurveConfig>::COEFF_D;

    let x1x2 = p.0 * q.0;
    let y1y2 = p.1 * q.1;
    let dprod = d * x1x2 * y1y2;

    let x3 = (p.0 * q.1 + p.1 * q.0) * (Fr::one() + dprod).inverse()?;
    let y3 = (y1y2 - a * x1x2) * (Fr::one() - dprod).inverse()?;
    Some((x3, y3))
}

/// Double-and-add over the integer value of `scalar`, mirroring the gadget:
/// the conditional addend is computed on every iteration, so an
/// unrepresentable intermediate fails here exactly when witness assignment
/// would fail in-circuit.
pub(crate) fn formula_mul(base: (Fr, Fr), scalar: Fr, bits: usize) -> Option<(Fr, Fr)> {
    let repr = scalar.into_bigint();
    let mut acc = (Fr::zero(), Fr::one());
    for i in (0..bits).rev() {
        acc = formula_add(acc, acc)?;
        let with_base = formula_add(acc, base)?;
        if repr.get_bit(i) {
            acc = with_base;
        }
    }
    Some(acc)
}

/// Circuit-exact evaluation of the signature flag over claim elements.
///
/// `Some(true)`/`Some(false)` predict the in-circuit flag; `None` means the
/// constraint system has no satisfying assignment for these inputs.
pub(crate) fn formula_verify(
    signer_public_key: [Fr; 2],
    message_hash: Fr,
    signature: [Fr; 3],
) -> Option<bool> {
    let generator = EdwardsAffine::generator();
    let challenge = challenge_hash(&[
        signature[0],
        signature[1],
        signer_public_key[0],
        signer_public_key[1],
        message_hash,
    ]);

    let lhs = formula_mul((generator.x, generator.y), signature[2], SESSION_SCALAR_BITS)?;
    let challenge_pk = formula_mul(
        (signer_public_key[0], signer_public_key[1]),
        challenge,
        Fr::MODULUS_BIT_SIZE as usize,
    )?;
    let rhs = formula_add((signature[0], signature[1]), challenge_pk)?;

    Some(lhs == rhs)
}
