//! Server configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use crate::store::{DEFAULT_SEED, Store};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}")]
    InvalidPort(String),
    #[error("cannot read seed {path}: {source}")]
    SeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed seed: {0}")]
    SeedParse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// JSON seed to load instead of the bundled one.
    pub seed_path: Option<PathBuf>,
}

impl Config {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 8080
    /// - `SEED_PATH`: bundled dev seed when absent
    ///
    /// # Errors
    ///
    /// `InvalidPort` when `PORT` is set but not a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let seed_path = lookup("SEED_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self { port, seed_path })
    }

    /// Load the configured seed into a fresh store.
    ///
    /// # Errors
    ///
    /// Read or parse failures of the seed file.
    pub fn load_store(&self) -> Result<Store, ConfigError> {
        let Some(path) = &self.seed_path else {
            return Ok(Store::from_seed_json(DEFAULT_SEED)?);
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::SeedRead { path: path.clone(), source })?;
        Ok(Store::from_seed_json(&raw)?)
    }
}
