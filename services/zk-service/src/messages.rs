//! JSON message contract for the proof service.
//!
//! Field elements travel as decimal strings, timestamps as integers. The
//! proof and verify payload shapes are re-exported from the core crate so
//! the wire contract has exactly one definition.

use serde::{Deserialize, Serialize};

use vibestream_zk::{parse_field_element, GenerationError, ListenSessionClaim};

pub use vibestream_zk::{ProofArtifactJson, ProofJson};

/// Request body for `POST /prove`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub song_hash: String,
    pub start_time: u64,
    pub current_time: u64,
    pub end_time: u64,
    /// `[R.x, R.y, s]` as decimal field elements.
    pub signature: [String; 3],
    /// `[pk.x, pk.y]` as decimal field elements.
    pub signer_public_key: [String; 2],
    pub message_hash: String,
}

impl GenerateRequest {
    /// Canonicalize the request into a claim; any non-field value is a
    /// malformed-input error before witness evaluation.
    pub fn into_claim(self) -> Result<ListenSessionClaim, GenerationError> {
        Ok(ListenSessionClaim {
            song_hash: parse_field_element(&self.song_hash)?,
            start_time: self.start_time,
            current_time: self.current_time,
            end_time: self.end_time,
            signature: [
                parse_field_element(&self.signature[0])?,
                parse_field_element(&self.signature[1])?,
                parse_field_element(&self.signature[2])?,
            ],
            signer_public_key: [
                parse_field_element(&self.signer_public_key[0])?,
                parse_field_element(&self.signer_public_key[1])?,
            ],
            message_hash: parse_field_element(&self.message_hash)?,
        })
    }
}

/// Response body for `POST /verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    /// Stable diagnostic code when not valid; null when accepted.
    pub diagnostic: Option<String>,
}

/// Response body for `GET /stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub proofs_generated: u64,
    pub proofs_verified: u64,
    pub proofs_failed: u64,
    pub avg_generation_ms: f64,
    pub avg_verification_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibestream_zk::field_to_decimal;

    fn request() -> GenerateRequest {
        GenerateRequest {
            song_hash: "123".into(),
            start_time: 10,
            current_time: 20,
            end_time: 30,
            signature: ["1".into(), "2".into(), "3".into()],
            signer_public_key: ["4".into(), "5".into()],
            message_hash: "6".into(),
        }
    }

    #[test]
    fn request_canonicalizes_into_a_claim() {
        let claim = request().into_claim().unwrap();
        assert_eq!(field_to_decimal(&claim.song_hash), "123");
        assert_eq!(claim.current_time, 20);
        assert_eq!(field_to_decimal(&claim.signature[2]), "3");
    }

    #[test]
    fn non_field_values_are_malformed_input() {
        let mut bad = request();
        bad.song_hash = "0xdeadbeef".into();
        assert!(matches!(
            bad.into_claim(),
            Err(GenerationError::MalformedInput(_))
        ));
    }

    #[test]
    fn request_json_uses_the_contract_field_names() {
        let text = serde_json::to_string(&request()).unwrap();
        for key in [
            "songHash",
            "startTime",
            "currentTime",
            "endTime",
            "signature",
            "signerPublicKey",
            "messageHash",
        ] {
            assert!(text.contains(key), "missing {key} in {text}");
        }
    }
}
