//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `GALLEY` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use galley::config::GalleyConfig;
//!
//! let config = GalleyConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Data directory: {}", config.storage.data_dir.display());
//! ```

mod error;
mod logging;
mod storage;
mod tools;

pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use storage::StorageConfig;
pub use tools::ToolsConfig;

use serde::Deserialize;

/// Root configuration
///
/// Every section has defaults, so an empty environment is a valid setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GalleyConfig {
    /// Document store location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Provisioning CLI and archiver
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Process diagnostics
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GalleyConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present
    /// 2. Reads environment variables with the `GALLEY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `GALLEY__STORAGE__DATA_DIR=/var/lib/galley` -> `storage.data_dir`
    /// - `GALLEY__TOOLS__OCI_PATH=/opt/oci/bin/oci` -> `tools.oci_path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GALLEY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an empty data directory or binary path,
    /// a timeout outside 1..=3600 seconds, a zero wait interval, or a zero
    /// output cap.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.storage.validate()?;
        self.tools.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
