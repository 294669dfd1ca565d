//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: CRUD_LIST_)
//! 2. Current working directory: ./config.toml (or an explicit path)
//! 3. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable prefix for list handler settings
pub const ENV_PREFIX: &str = "CRUD_LIST_";

/// Default upper bound for one list request, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Largest accepted request timeout, in seconds (one day)
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// List handler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Upper bound for a single list request in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            log_level: default_log_level(),
        }
    }
}

impl ListConfig {
    /// Load configuration from `./config.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment variables
    /// still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
        }

        Self::from_figment(
            Figment::new()
                .merge(Serialized::defaults(ListConfig::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    /// Extract and check configuration from a prepared figment
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Request timeout as a [`Duration`]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(Error::InvalidConfig(format!(
                "timeout_secs must be at most {MAX_TIMEOUT_SECS}"
            )));
        }
        Ok(())
    }
}
