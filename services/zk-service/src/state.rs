//! Shared application state: loaded parameters, prover, verifier, stats.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};

use vibestream_zk::{
    Ceremony, ContributionSecret, ListenProver, ListenVerifier, ParameterSet,
};

use crate::config::Config;
use crate::stats::ServiceStats;

pub struct AppState {
    pub config: Config,
    pub prover: Arc<ListenProver>,
    pub verifier: Arc<ListenVerifier>,
    pub stats: ServiceStats,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let dir = Path::new(&config.artifacts_dir);
        let params = load_or_bootstrap(dir, &config)?;

        if params.statement != config.statement {
            bail!(
                "configured statement (min_listen_seconds={}) does not match loaded artifacts (min_listen_seconds={})",
                config.statement.min_listen_seconds,
                params.statement.min_listen_seconds,
            );
        }

        let prover = ListenProver::new(params.proving.clone(), params.statement.clone())
            .context("proving key does not pair with the compiled statement")?;
        let verifier = ListenVerifier::new(params.verification.clone(), &params.statement)
            .context("verification key does not pair with the compiled statement")?;

        Ok(Self {
            config,
            prover: Arc::new(prover),
            verifier: Arc::new(verifier),
            stats: ServiceStats::new(),
        })
    }
}

fn load_or_bootstrap(dir: &Path, config: &Config) -> anyhow::Result<ParameterSet> {
    if dir.join("statement.json").exists() {
        return ParameterSet::load(dir)
            .with_context(|| format!("loading parameter artifacts from {}", dir.display()));
    }

    if !config.dev_setup {
        bail!(
            "CRITICAL: parameter artifacts missing at {}. Run the ceremony and deploy its output; \
             refusing to generate throwaway parameters outside dev mode.",
            dir.display()
        );
    }

    tracing::warn!(
        dir = %dir.display(),
        "dev mode: generating throwaway parameters from a single-party ceremony"
    );
    let mut ceremony = Ceremony::new(config.statement.clone());
    let mut rng = rand::rngs::OsRng;
    ceremony.contribute_universal("dev-universal", &ContributionSecret::random(&mut rng))?;
    ceremony.contribute_specific("dev-specific", &ContributionSecret::random(&mut rng))?;
    let (params, _transcript) = ceremony.finalize()?;
    params.save(dir)?;
    Ok(params)
}
