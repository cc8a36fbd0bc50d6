//! Service configuration: TOML base plus environment overrides.

use std::env;

use vibestream_core::Config as CoreConfig;
use vibestream_zk::StatementConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub artifacts_dir: String,
    pub dev_setup: bool,
    pub statement: StatementConfig,
}

impl Config {
    /// Load the base config from `VIBESTREAM_CONFIG` (TOML) when set,
    /// falling back to defaults, then apply environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let base = match env::var("VIBESTREAM_CONFIG") {
            Ok(path) => CoreConfig::from_file(&path)?,
            Err(_) => CoreConfig::default_config(),
        };

        let port = match env::var("PORT") {
            Ok(value) => value.parse()?,
            Err(_) => base.service.port,
        };
        let artifacts_dir = env::var("ARTIFACTS_DIR").unwrap_or(base.artifacts.dir);
        let dev_setup = match env::var("DEV_SETUP") {
            Ok(value) => value == "1" || value.eq_ignore_ascii_case("true"),
            Err(_) => base.artifacts.dev_setup,
        };
        let min_listen_seconds = match env::var("MIN_LISTEN_SECONDS") {
            Ok(value) => value.parse()?,
            Err(_) => StatementConfig::default().min_listen_seconds,
        };

        Ok(Self {
            port,
            artifacts_dir,
            dev_setup,
            statement: StatementConfig { min_listen_seconds },
        })
    }
}
