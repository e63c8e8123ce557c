//! Storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where session documents live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root of the document store
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("storage.data_dir"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".galley")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_dir_is_hidden_directory() {
        assert_eq!(StorageConfig::default().data_dir, PathBuf::from(".galley"));
        assert!(StorageConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_data_dir_is_rejected() {
        let config = StorageConfig {
            data_dir: PathBuf::new(),
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("storage.data_dir"))
        );
    }
}
