//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Identity identifier issued by the remote identity provider.
///
/// Immutable and unique per account. Provider ids are opaque strings, so
/// no format is assumed beyond being non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    /// Creates a new IdentityId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("identity_id"));
        }
        Ok(Self(id))
    }

    /// Generates a random id, as a provider does when registering an account.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_id_accepts_non_empty_string() {
        let id = IdentityId::new("uid-123").unwrap();
        assert_eq!(id.as_str(), "uid-123");
    }

    #[test]
    fn identity_id_rejects_blank_string() {
        let result = IdentityId::new("  ");
        match result {
            Err(ValidationError::EmptyField { field, .. }) => assert_eq!(field, "identity_id"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(IdentityId::generate(), IdentityId::generate());
    }

    #[test]
    fn identity_id_serializes_as_plain_string() {
        let id = IdentityId::new("uid-9").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"uid-9\"");
    }
}
