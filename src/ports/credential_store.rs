//! Credential store port - device-local remembered credential.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::auth::{AuthError, RememberedCredential};

/// Errors that can occur during local credential storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialStoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to serialize credential: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize credential: {0}")]
    DeserializationFailed(String),
}

impl From<CredentialStoreError> for AuthError {
    fn from(err: CredentialStoreError) -> Self {
        AuthError::CredentialStore(err.to_string())
    }
}

/// Single-slot storage for the remembered credential, independent of the
/// remote backend. Absence means "no returning-user fast path".
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self) -> Result<Option<RememberedCredential>, CredentialStoreError>;

    /// Replaces whatever credential was stored.
    async fn set(&self, credential: &RememberedCredential) -> Result<(), CredentialStoreError>;

    /// Removes the credential. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), CredentialStoreError>;
}
