//! Domain identifier types shared across the Proof-of-Listen stack.

use serde::{Deserialize, Serialize};

/// Opaque song identifier as known to the catalog layer.
///
/// The cryptographic core never interprets this value; it is committed to
/// via a field-element hash before entering the circuit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongId(pub String);

/// Opaque listener identifier as known to the account layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub String);

/// Per-session nonce issued when a listening session starts.
///
/// The nonce is bound into the signed session message and is the unit of
/// replay protection at the reward gateway: one nonce, one reward decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionNonce(pub [u8; 16]);

impl SessionNonce {
    /// Hex form used in logs and gateway bookkeeping.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for SongId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
