//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid timeout for {0}: must be between 1 and 3600 seconds")]
    InvalidTimeout(&'static str),

    #[error("Wait interval must be at least one second")]
    InvalidWaitInterval,

    #[error("Output cap must be greater than zero")]
    InvalidOutputCap,
}
