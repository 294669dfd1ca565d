//! Crate-level error types
//!
//! Request-path failures are modelled by [`ListError`](crate::handlers::ListError)
//! and never surface here. This enum covers the setup side: loading
//! configuration and installing the tracing subscriber.

use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring the list handler
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration loaded but holds an unusable value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tracing subscriber could not be installed
    #[error("Tracing initialization failed: {0}")]
    Tracing(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
