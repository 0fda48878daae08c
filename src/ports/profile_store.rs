//! Profile store port - the remote document store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::IdentityId;
use crate::domain::profile::{Profile, ProfileUpdate};

/// Errors that can occur during profile document operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileStoreError {
    #[error("Profile not found for identity: {0}")]
    NotFound(IdentityId),

    #[error("Profile already exists for identity: {0}")]
    AlreadyExists(IdentityId),

    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid profile document: {0}")]
    InvalidDocument(String),
}

/// Profile documents keyed by identity id.
///
/// Last write wins; there are no transactions. Callers order their writes.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Creates the profile document.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if a document for this identity exists. Callers that
    /// retry after a partial failure treat it as success.
    async fn create(&self, profile: &Profile) -> Result<(), ProfileStoreError>;

    async fn get(&self, identity_id: &IdentityId) -> Result<Option<Profile>, ProfileStoreError>;

    /// Merges the set fields into the document and refreshes `updatedAt`.
    async fn update(
        &self,
        identity_id: &IdentityId,
        update: &ProfileUpdate,
    ) -> Result<(), ProfileStoreError>;
}
