//! In-Memory Profile Store Adapter
//!
//! Keeps each profile as a JSON document keyed by identity id, the way a
//! hosted document database does, and merges partial updates field by
//! field. Useful for testing and development.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{IdentityId, Timestamp};
use crate::domain::profile::{Profile, ProfileUpdate};
use crate::ports::{ProfileStore, ProfileStoreError};

/// In-memory document store for profiles.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    documents: Arc<RwLock<HashMap<IdentityId, Value>>>,
    fail_writes: Arc<AtomicBool>,
    write_attempts: Arc<AtomicUsize>,
}

impl InMemoryProfileStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every create/update fail with `Unavailable` until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of create/update calls, including failed ones.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    /// Number of stored documents.
    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Raw stored document (for assertions on the wire shape).
    pub async fn raw_document(&self, identity_id: &IdentityId) -> Option<Value> {
        self.documents.read().await.get(identity_id).cloned()
    }

    fn check_writable(&self) -> Result<(), ProfileStoreError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ProfileStoreError::Unavailable(
                "The service is currently unavailable.".to_string(),
            ));
        }
        Ok(())
    }
}

fn to_object(value: Value) -> Result<Map<String, Value>, ProfileStoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ProfileStoreError::InvalidDocument(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn create(&self, profile: &Profile) -> Result<(), ProfileStoreError> {
        self.check_writable()?;

        let document = serde_json::to_value(profile)
            .map_err(|e| ProfileStoreError::InvalidDocument(e.to_string()))?;

        let mut documents = self.documents.write().await;
        if documents.contains_key(profile.identity_id()) {
            return Err(ProfileStoreError::AlreadyExists(profile.identity_id().clone()));
        }
        documents.insert(profile.identity_id().clone(), document);
        tracing::debug!("Profile document created for {}", profile.identity_id());
        Ok(())
    }

    async fn get(&self, identity_id: &IdentityId) -> Result<Option<Profile>, ProfileStoreError> {
        let documents = self.documents.read().await;
        documents
            .get(identity_id)
            .map(|document| {
                serde_json::from_value(document.clone())
                    .map_err(|e| ProfileStoreError::InvalidDocument(e.to_string()))
            })
            .transpose()
    }

    async fn update(
        &self,
        identity_id: &IdentityId,
        update: &ProfileUpdate,
    ) -> Result<(), ProfileStoreError> {
        self.check_writable()?;

        let fields = serde_json::to_value(update)
            .map_err(|e| ProfileStoreError::InvalidDocument(e.to_string()))
            .and_then(to_object)?;
        let updated_at = serde_json::to_value(Timestamp::now())
            .map_err(|e| ProfileStoreError::InvalidDocument(e.to_string()))?;

        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(identity_id)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| ProfileStoreError::NotFound(identity_id.clone()))?;

        for (field, value) in fields {
            document.insert(field, value);
        }
        document.insert("updatedAt".to_string(), updated_at);
        tracing::debug!("Profile document updated for {}", identity_id);
        Ok(())
    }
}
