//! External tool configuration

use serde::Deserialize;
use std::time::Duration;

use crate::adapters::cli::{OciCliSettings, DEFAULT_MAX_OUTPUT_BYTES};
use crate::adapters::ProcessToolRunner;

use super::error::ValidationError;

const MAX_TIMEOUT_SECS: u64 = 3600;

/// Provisioning CLI and archiver settings
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// Provisioning CLI binary
    #[serde(default = "default_oci_path")]
    pub oci_path: String,

    /// Archiver binary
    #[serde(default = "default_zip_path")]
    pub zip_path: String,

    /// Bound on any tool run that does not set its own
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,

    /// Bound on stack create, including the wait for ACTIVE
    #[serde(default = "default_stack_wait_timeout_secs")]
    pub stack_wait_timeout_secs: u64,

    /// Polling interval passed to `--wait-interval-seconds`
    #[serde(default = "default_wait_interval_secs")]
    pub wait_interval_secs: u64,

    /// Cap on captured stdout/stderr, per stream
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

impl ToolsConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    pub fn stack_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.stack_wait_timeout_secs)
    }

    /// Settings for the provisioning CLI client.
    pub fn oci_settings(&self) -> OciCliSettings {
        OciCliSettings {
            oci_path: self.oci_path.clone(),
            zip_path: self.zip_path.clone(),
            default_timeout: self.default_timeout(),
            stack_wait_timeout: self.stack_wait_timeout(),
            wait_interval_secs: self.wait_interval_secs,
        }
    }

    /// A process runner honouring these settings.
    pub fn process_runner(&self) -> ProcessToolRunner {
        ProcessToolRunner::new()
            .with_zip_path(&self.zip_path)
            .with_default_timeout(self.default_timeout())
            .with_max_output_bytes(self.max_output_bytes)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.oci_path.trim().is_empty() {
            return Err(ValidationError::MissingRequired("tools.oci_path"));
        }
        if self.zip_path.trim().is_empty() {
            return Err(ValidationError::MissingRequired("tools.zip_path"));
        }
        if !(1..=MAX_TIMEOUT_SECS).contains(&self.default_timeout_secs) {
            return Err(ValidationError::InvalidTimeout("tools.default_timeout_secs"));
        }
        if !(1..=MAX_TIMEOUT_SECS).contains(&self.stack_wait_timeout_secs) {
            return Err(ValidationError::InvalidTimeout("tools.stack_wait_timeout_secs"));
        }
        if self.wait_interval_secs == 0 {
            return Err(ValidationError::InvalidWaitInterval);
        }
        if self.max_output_bytes == 0 {
            return Err(ValidationError::InvalidOutputCap);
        }
        Ok(())
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            oci_path: default_oci_path(),
            zip_path: default_zip_path(),
            default_timeout_secs: default_timeout_secs(),
            stack_wait_timeout_secs: default_stack_wait_timeout_secs(),
            wait_interval_secs: default_wait_interval_secs(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

fn default_oci_path() -> String {
    "oci".to_string()
}

fn default_zip_path() -> String {
    "zip".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_stack_wait_timeout_secs() -> u64 {
    300
}

fn default_wait_interval_secs() -> u64 {
    5
}

fn default_max_output_bytes() -> usize {
    DEFAULT_MAX_OUTPUT_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_settings_defaults() {
        let config = ToolsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.oci_settings(), OciCliSettings::default());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ToolsConfig {
            default_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTimeout("tools.default_timeout_secs"))
        );
    }

    #[test]
    fn timeout_over_an_hour_is_rejected() {
        let config = ToolsConfig {
            stack_wait_timeout_secs: 3601,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_wait_interval_is_rejected() {
        let config = ToolsConfig {
            wait_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidWaitInterval));
    }

    #[test]
    fn zero_output_cap_is_rejected() {
        let config = ToolsConfig {
            max_output_bytes: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidOutputCap));
    }
}
