//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::{
    config::ListConfig,
    error::{Error, Result},
};

/// Install a JSON tracing subscriber filtered by the configured log level
///
/// Fails if a global subscriber has already been installed.
pub fn init_tracing(config: &ListConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::Tracing(e.to_string()))?;

    tracing::info!(
        timeout_secs = config.timeout_secs,
        "Tracing initialized for list handler"
    );

    Ok(())
}
