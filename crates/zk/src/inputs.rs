//! Claim, statement, and proof-artifact types.
//!
//! A [`ListenSessionClaim`] is the private witness material for one
//! session; it lives for exactly one `generate` call and is never
//! persisted. The [`PublicStatement`] is the only data a verifier ever
//! sees besides the proof itself, and its signal ordering is part of the
//! external contract.

use ark_bn254::{Bn254, Fr};
use ark_ff::{BigInteger, One, PrimeField};
use ark_groth16::Proof;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, VerifyError};
use crate::field::{field_to_decimal, parse_field_element};
use crate::sig::SESSION_SCALAR_BITS;

/// Number of public signals the statement exposes.
pub const PUBLIC_SIGNAL_COUNT: usize = 5;

/// Private witness for one listening session.
#[derive(Debug, Clone)]
pub struct ListenSessionClaim {
    /// Field commitment to the song identifier.
    pub song_hash: Fr,
    /// Session window start, Unix seconds.
    pub start_time: u64,
    /// Client playhead clock at proof time, Unix seconds.
    pub current_time: u64,
    /// Session window end, Unix seconds.
    pub end_time: u64,
    /// Session signature as `[R.x, R.y, s]`.
    pub signature: [Fr; 3],
    /// Signer public key as `[pk.x, pk.y]`.
    pub signer_public_key: [Fr; 2],
    /// Hash binding the signature to the session context.
    pub message_hash: Fr,
}

impl ListenSessionClaim {
    /// Schema-level validation performed before witness evaluation.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let response_bits = self.signature[2].into_bigint().num_bits() as usize;
        if response_bits > SESSION_SCALAR_BITS {
            return Err(GenerationError::MalformedInput(format!(
                "signature response needs {response_bits} bits, limit is {SESSION_SCALAR_BITS}"
            )));
        }
        Ok(())
    }
}

/// The public side of one proven session, in declared signal order:
/// `[verified_song_hash, valid_playtime, pk.x, pk.y, message_hash]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicStatement {
    pub verified_song_hash: Fr,
    pub valid_playtime: Fr,
    pub signer_public_key: [Fr; 2],
    pub message_hash: Fr,
}

impl PublicStatement {
    /// Whether the proven session satisfied the listen predicate.
    pub fn playtime_is_valid(&self) -> bool {
        self.valid_playtime == Fr::one()
    }

    /// Signals in the declared output order.
    pub fn to_signals(&self) -> Vec<Fr> {
        vec![
            self.verified_song_hash,
            self.valid_playtime,
            self.signer_public_key[0],
            self.signer_public_key[1],
            self.message_hash,
        ]
    }

    /// Rebuild from an ordered signal list; None on wrong arity.
    pub fn from_signals(signals: &[Fr]) -> Option<Self> {
        if signals.len() != PUBLIC_SIGNAL_COUNT {
            return None;
        }
        Some(Self {
            verified_song_hash: signals[0],
            valid_playtime: signals[1],
            signer_public_key: [signals[2], signals[3]],
            message_hash: signals[4],
        })
    }
}

/// One generated proof plus its ordered public signals.
#[derive(Debug, Clone)]
pub struct ProofArtifact {
    pub proof: Proof<Bn254>,
    pub public_signals: Vec<Fr>,
}

/// Wire form of a Groth16 proof: compressed, hex-encoded curve points plus
/// protocol identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofJson {
    /// Proof component A (compressed G1 point)
    pub pi_a: String,
    /// Proof component B (compressed G2 point)
    pub pi_b: String,
    /// Proof component C (compressed G1 point)
    pub pi_c: String,
    /// Protocol identifier (e.g., "groth16")
    pub protocol: String,
    /// Elliptic curve identifier (e.g., "bn254")
    pub curve: String,
}

/// Wire form of a full proof artifact. `public_signals` ordering is part
/// of the contract; consumers must not assume named fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofArtifactJson {
    pub proof: ProofJson,
    pub public_signals: Vec<String>,
}

pub(crate) const PROTOCOL: &str = "groth16";
pub(crate) const CURVE: &str = "bn254";

fn encode_point<T: CanonicalSerialize>(point: &T) -> String {
    let mut bytes = Vec::new();
    point
        .serialize_compressed(&mut bytes)
        .expect("compressed serialization into a Vec cannot fail");
    hex::encode(bytes)
}

fn decode_point<T: CanonicalDeserialize>(text: &str, label: &str) -> Result<T, VerifyError> {
    let bytes = hex::decode(text)
        .map_err(|err| VerifyError::MalformedProof(format!("{label}: {err}")))?;
    T::deserialize_compressed(bytes.as_slice())
        .map_err(|err| VerifyError::MalformedProof(format!("{label}: {err}")))
}

impl ProofArtifact {
    pub fn to_json(&self) -> ProofArtifactJson {
        ProofArtifactJson {
            proof: ProofJson {
                pi_a: encode_point(&self.proof.a),
                pi_b: encode_point(&self.proof.b),
                pi_c: encode_point(&self.proof.c),
                protocol: PROTOCOL.to_string(),
                curve: CURVE.to_string(),
            },
            public_signals: self.public_signals.iter().map(field_to_decimal).collect(),
        }
    }

    pub fn from_json(json: &ProofArtifactJson) -> Result<Self, VerifyError> {
        if json.proof.protocol != PROTOCOL {
            return Err(VerifyError::MalformedProof(format!(
                "unsupported protocol: {}",
                json.proof.protocol
            )));
        }
        if json.proof.curve != CURVE {
            return Err(VerifyError::MalformedProof(format!(
                "unsupported curve: {}",
                json.proof.curve
            )));
        }

        let proof = Proof::<Bn254> {
            a: decode_point(&json.proof.pi_a, "pi_a")?,
            b: decode_point(&json.proof.pi_b, "pi_b")?,
            c: decode_point(&json.proof.pi_c, "pi_c")?,
        };

        let public_signals = json
            .public_signals
            .iter()
            .map(|signal| {
                parse_field_element(signal)
                    .map_err(|err| VerifyError::MalformedProof(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            proof,
            public_signals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::Zero;

    #[test]
    fn statement_signal_order_is_stable() {
        let statement = PublicStatement {
            verified_song_hash: Fr::from(1u64),
            valid_playtime: Fr::one(),
            signer_public_key: [Fr::from(3u64), Fr::from(4u64)],
            message_hash: Fr::from(5u64),
        };

        let signals = statement.to_signals();
        assert_eq!(signals.len(), PUBLIC_SIGNAL_COUNT);
        assert_eq!(signals[0], Fr::from(1u64));
        assert_eq!(signals[1], Fr::one());
        assert_eq!(signals[4], Fr::from(5u64));

        assert_eq!(PublicStatement::from_signals(&signals), Some(statement));
        assert_eq!(PublicStatement::from_signals(&signals[..4]), None);
    }

    #[test]
    fn claim_rejects_oversized_response_scalar() {
        let claim = ListenSessionClaim {
            song_hash: Fr::zero(),
            start_time: 0,
            current_time: 0,
            end_time: 0,
            signature: [Fr::zero(), Fr::one(), -Fr::one()],
            signer_public_key: [Fr::zero(), Fr::one()],
            message_hash: Fr::zero(),
        };
        assert!(matches!(
            claim.validate(),
            Err(GenerationError::MalformedInput(_))
        ));
    }

    #[test]
    fn malformed_proof_json_is_detected() {
        let json = ProofArtifactJson {
            proof: ProofJson {
                pi_a: "zz".into(),
                pi_b: String::new(),
                pi_c: String::new(),
                protocol: PROTOCOL.into(),
                curve: CURVE.into(),
            },
            public_signals: vec![],
        };
        assert!(matches!(
            ProofArtifact::from_json(&json),
            Err(VerifyError::MalformedProof(_))
        ));
    }

    #[test]
    fn wrong_protocol_tag_is_rejected() {
        let json = ProofArtifactJson {
            proof: ProofJson {
                pi_a: String::new(),
                pi_b: String::new(),
                pi_c: String::new(),
                protocol: "plonk".into(),
                curve: CURVE.into(),
            },
            public_signals: vec![],
        };
        assert!(matches!(
            ProofArtifact::from_json(&json),
            Err(VerifyError::MalformedProof(_))
        ));
    }
}
