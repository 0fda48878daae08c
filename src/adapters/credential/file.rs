//! File-based Credential Store Adapter
//!
//! Stores the remembered credential as a single YAML file. The file's
//! presence is the credential's presence.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::auth::RememberedCredential;
use crate::ports::{CredentialStore, CredentialStoreError};

/// File-based storage for the remembered credential
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by the file at `path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileCredentialStore::new("./data/remembered_credential.yaml");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent_dir(&self) -> Result<(), CredentialStoreError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| CredentialStoreError::Io(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<RememberedCredential>, CredentialStoreError> {
        let yaml = match fs::read_to_string(&self.path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CredentialStoreError::Io(e.to_string())),
        };

        let credential = serde_yaml::from_str(&yaml)
            .map_err(|e| CredentialStoreError::DeserializationFailed(e.to_string()))?;

        Ok(Some(credential))
    }

    async fn set(&self, credential: &RememberedCredential) -> Result<(), CredentialStoreError> {
        self.ensure_parent_dir().await?;

        let yaml = serde_yaml::to_string(credential)
            .map_err(|e| CredentialStoreError::SerializationFailed(e.to_string()))?;

        // Write to a sibling file first so a crash never leaves half a credential
        let tmp_path = self.path.with_extension("yaml.tmp");
        fs::write(&tmp_path, yaml)
            .await
            .map_err(|e| CredentialStoreError::Io(e.to_string()))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| CredentialStoreError::Io(e.to_string()))?;

        tracing::debug!("Remembered credential written to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("Remembered credential removed from {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialStoreError::Io(e.to_string())),
        }
    }
}
