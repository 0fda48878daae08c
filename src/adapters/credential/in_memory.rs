//! In-Memory Credential Store Adapter
//!
//! Holds the remembered credential in memory. Clones share the same slot,
//! so a test can hand one clone to a controller and keep another to
//! inspect or to "relaunch" with.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::auth::RememberedCredential;
use crate::ports::{CredentialStore, CredentialStoreError};

/// In-memory storage for the remembered credential
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    slot: Arc<RwLock<Option<RememberedCredential>>>,
    fail_with: Arc<RwLock<Option<CredentialStoreError>>>,
}

impl InMemoryCredentialStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already remembers a credential
    pub fn with_credential(credential: RememberedCredential) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(credential))),
            ..Self::default()
        }
    }

    /// Makes every operation fail with `error` until cleared with `None`
    pub async fn set_failure(&self, error: Option<CredentialStoreError>) {
        *self.fail_with.write().await = error;
    }

    /// Peek at the stored credential without going through the port
    pub async fn snapshot(&self) -> Option<RememberedCredential> {
        self.slot.read().await.clone()
    }

    async fn check(&self) -> Result<(), CredentialStoreError> {
        match self.fail_with.read().await.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self) -> Result<Option<RememberedCredential>, CredentialStoreError> {
        self.check().await?;
        Ok(self.slot.read().await.clone())
    }

    async fn set(&self, credential: &RememberedCredential) -> Result<(), CredentialStoreError> {
        self.check().await?;
        *self.slot.write().await = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        self.check().await?;
        *self.slot.write().await = None;
        Ok(())
    }
}
