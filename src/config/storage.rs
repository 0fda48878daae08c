//! Local storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Device-local storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// File holding the remembered credential
    #[serde(default = "default_credential_path")]
    pub credential_path: PathBuf,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.credential_path.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__CREDENTIAL_PATH"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            credential_path: default_credential_path(),
        }
    }
}

fn default_credential_path() -> PathBuf {
    PathBuf::from("./data/remembered_credential.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::default();
        assert_eq!(
            config.credential_path,
            PathBuf::from("./data/remembered_credential.yaml")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_path_rejected() {
        let config = StorageConfig {
            credential_path: PathBuf::new(),
        };
        assert!(config.validate().is_err());
    }
}
