//! Shared fixtures for the end-to-end tests.

use std::sync::OnceLock;

use ark_bn254::Fr;
use rand::rngs::StdRng;
use rand::SeedableRng;

use vibestream_core::SessionNonce;
use vibestream_zk::{
    session_message_hash, song_commitment, Ceremony, ContributionSecret, ListenProver,
    ListenSessionClaim, ListenVerifier, ParameterSet, SigningKey, StatementConfig,
};

/// Statement used across the suite; matches the concrete spec scenario
/// (min listen of 10 seconds).
pub fn statement() -> StatementConfig {
    StatementConfig {
        min_listen_seconds: 10,
    }
}

/// Run a toy ceremony for `statement()` with the given entropy labels.
pub fn toy_ceremony(labels: &[&str]) -> ParameterSet {
    let mut ceremony = Ceremony::new(statement());
    let (universal, specific) = labels.split_at(labels.len() - 1);
    for label in universal {
        ceremony
            .contribute_universal(label, &ContributionSecret::from_material(label.as_bytes()))
            .expect("toy contribution");
    }
    for label in specific {
        ceremony
            .contribute_specific(label, &ContributionSecret::from_material(label.as_bytes()))
            .expect("toy contribution");
    }
    ceremony.finalize().expect("toy ceremony finalizes").0
}

/// Parameters shared by the whole suite; set up once per test binary.
pub fn shared_parameters() -> &'static ParameterSet {
    static PARAMETERS: OnceLock<ParameterSet> = OnceLock::new();
    PARAMETERS.get_or_init(|| toy_ceremony(&["alice", "bob", "carol"]))
}

pub fn shared_prover() -> ListenProver {
    let params = shared_parameters();
    ListenProver::new(params.proving.clone(), params.statement.clone())
        .expect("shared parameters pair with the shared statement")
}

pub fn shared_verifier() -> ListenVerifier {
    let params = shared_parameters();
    ListenVerifier::new(params.verification.clone(), &params.statement)
        .expect("shared parameters pair with the shared statement")
}

/// One listener session context: a keypair, a song, and a nonce.
pub struct SessionFixture {
    pub signing_key: SigningKey,
    pub song_hash: Fr,
    pub nonce: SessionNonce,
}

impl SessionFixture {
    pub fn new(seed: u64, song_id: &[u8]) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            signing_key: SigningKey::generate(&mut rng),
            song_hash: song_commitment(song_id).expect("song id commits"),
            nonce: SessionNonce([seed as u8; 16]),
        }
    }

    /// A fully signed claim for a play window.
    pub fn claim(&self, start: u64, current: u64, end: u64) -> ListenSessionClaim {
        let message_hash = session_message_hash(self.song_hash, start, end, &self.nonce)
            .expect("message hash");
        let signature = self.signing_key.sign(message_hash);

        ListenSessionClaim {
            song_hash: self.song_hash,
            start_time: start,
            current_time: current,
            end_time: end,
            signature: signature.to_elements(),
            signer_public_key: self.signing_key.verifying_key().to_elements(),
            message_hash,
        }
    }
}
