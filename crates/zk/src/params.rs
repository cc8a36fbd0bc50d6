//! Versioned parameter artifacts.
//!
//! The ceremony emits a proving key, a verification key, and the statement
//! descriptor they were specialized to. The three are only meaningful
//! together, so they are stored together and every load re-checks that the
//! embedded statement hash matches the descriptor; a mismatch anywhere is
//! a hard configuration error, never silently tolerated.

use std::path::Path;
use std::sync::Arc;

use ark_bn254::Bn254;
use ark_groth16::{prepare_verifying_key, PreparedVerifyingKey, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

use crate::circuit::{StatementConfig, STATEMENT_VERSION};
use crate::error::ArtifactError;

const MAGIC: &[u8; 4] = b"VSZK";
const STATEMENT_FILE: &str = "statement.json";
const PROVING_KEY_FILE: &str = "listen.pk";
const VERIFICATION_KEY_FILE: &str = "listen.vk";

/// Circuit-specific Groth16 proving key, tagged with its statement hash.
#[derive(Clone, Debug)]
pub struct ProvingParameters {
    pub key: ProvingKey<Bn254>,
    pub statement_hash: [u8; 32],
}

/// Verification key plus its prepared form, tagged with its statement hash.
#[derive(Clone, Debug)]
pub struct VerificationParameters {
    pub key: VerifyingKey<Bn254>,
    pub prepared: PreparedVerifyingKey<Bn254>,
    pub statement_hash: [u8; 32],
}

/// Everything the ceremony hands over, versioned as one unit.
#[derive(Clone, Debug)]
pub struct ParameterSet {
    pub statement: StatementConfig,
    pub proving: Arc<ProvingParameters>,
    pub verification: Arc<VerificationParameters>,
}

/// On-disk statement descriptor stored beside the keys.
#[derive(Debug, Serialize, Deserialize)]
struct StatementDescriptor {
    version: u32,
    min_listen_seconds: u64,
    statement_hash: String,
}

impl ParameterSet {
    pub(crate) fn new(
        statement: StatementConfig,
        proving_key: ProvingKey<Bn254>,
        verifying_key: VerifyingKey<Bn254>,
    ) -> Self {
        let statement_hash = statement.statement_hash();
        let prepared = prepare_verifying_key(&verifying_key);
        Self {
            statement,
            proving: Arc::new(ProvingParameters {
                key: proving_key,
                statement_hash,
            }),
            verification: Arc::new(VerificationParameters {
                key: verifying_key,
                prepared,
                statement_hash,
            }),
        }
    }

    /// Write the descriptor and both keys under `dir`.
    pub fn save(&self, dir: &Path) -> Result<(), ArtifactError> {
        std::fs::create_dir_all(dir)?;

        let descriptor = StatementDescriptor {
            version: STATEMENT_VERSION,
            min_listen_seconds: self.statement.min_listen_seconds,
            statement_hash: hex::encode(self.proving.statement_hash),
        };
        let descriptor_json = serde_json::to_string_pretty(&descriptor)
            .map_err(|err| ArtifactError::Encoding(err.to_string()))?;
        std::fs::write(dir.join(STATEMENT_FILE), descriptor_json)?;

        write_key(
            &dir.join(PROVING_KEY_FILE),
            &self.proving.key,
            &self.proving.statement_hash,
        )?;
        write_key(
            &dir.join(VERIFICATION_KEY_FILE),
            &self.verification.key,
            &self.verification.statement_hash,
        )?;

        tracing::info!(dir = %dir.display(), "parameter artifacts written");
        Ok(())
    }

    /// Load and cross-check the artifacts under `dir`.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let descriptor_text = std::fs::read_to_string(dir.join(STATEMENT_FILE))?;
        let descriptor: StatementDescriptor = serde_json::from_str(&descriptor_text)
            .map_err(|err| ArtifactError::Malformed(err.to_string()))?;

        if descriptor.version != STATEMENT_VERSION {
            return Err(ArtifactError::StatementMismatch {
                expected: format!("version {STATEMENT_VERSION}"),
                found: format!("version {}", descriptor.version),
            });
        }

        let statement = StatementConfig {
            min_listen_seconds: descriptor.min_listen_seconds,
        };
        let statement_hash = statement.statement_hash();
        if hex::encode(statement_hash) != descriptor.statement_hash {
            return Err(ArtifactError::StatementMismatch {
                expected: hex::encode(statement_hash),
                found: descriptor.statement_hash,
            });
        }

        // The proving key is a large, locally produced artifact; skip the
        // per-point subgroup checks on load. The verification key is small
        // and fully validated.
        let proving_key: ProvingKey<Bn254> = read_key(
            &dir.join(PROVING_KEY_FILE),
            &statement_hash,
            |bytes| ProvingKey::deserialize_compressed_unchecked(bytes),
        )?;
        let verifying_key: VerifyingKey<Bn254> = read_key(
            &dir.join(VERIFICATION_KEY_FILE),
            &statement_hash,
            |bytes| VerifyingKey::deserialize_compressed(bytes),
        )?;

        tracing::info!(dir = %dir.display(), "parameter artifacts loaded");
        Ok(Self::new(statement, proving_key, verifying_key))
    }
}

fn write_key<K: CanonicalSerialize>(
    path: &Path,
    key: &K,
    statement_hash: &[u8; 32],
) -> Result<(), ArtifactError> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&STATEMENT_VERSION.to_le_bytes());
    bytes.extend_from_slice(statement_hash);
    key.serialize_compressed(&mut bytes)
        .map_err(|err| ArtifactError::Encoding(err.to_string()))?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn read_key<K>(
    path: &Path,
    expected_hash: &[u8; 32],
    decode: impl FnOnce(&[u8]) -> Result<K, ark_serialize::SerializationError>,
) -> Result<K, ArtifactError> {
    let bytes = std::fs::read(path)?;
    let header_len = MAGIC.len() + 4 + 32;
    if bytes.len() < header_len {
        return Err(ArtifactError::Malformed(format!(
            "{}: truncated header",
            path.display()
        )));
    }

    if &bytes[..MAGIC.len()] != MAGIC {
        return Err(ArtifactError::Malformed(format!(
            "{}: bad magic",
            path.display()
        )));
    }

    let version = u32::from_le_bytes(bytes[4..8].try_into().expect("fixed slice"));
    if version != STATEMENT_VERSION {
        return Err(ArtifactError::StatementMismatch {
            expected: format!("version {STATEMENT_VERSION}"),
            found: format!("version {version}"),
        });
    }

    let embedded_hash = &bytes[8..40];
    if embedded_hash != expected_hash {
        return Err(ArtifactError::StatementMismatch {
            expected: hex::encode(expected_hash),
            found: hex::encode(embedded_hash),
        });
    }

    decode(&bytes[header_len..]).map_err(|err| ArtifactError::Encoding(err.to_string()))
}
