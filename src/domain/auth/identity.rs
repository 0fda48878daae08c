//! Provider-verified identity snapshot.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::IdentityId;

/// Point-in-time snapshot of "who is signed in", as pushed by the identity
/// provider. Absence (`Option::None`) means nobody is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: IdentityId,
    email: String,
    display_name: Option<String>,
}

impl Identity {
    pub fn new(id: IdentityId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: display_name.filter(|n| !n.trim().is_empty()),
        }
    }

    pub fn id(&self) -> &IdentityId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Display name, else the local part of the email, else "User".
    pub fn display_name_or_fallback(&self) -> String {
        if let Some(name) = &self.display_name {
            return name.clone();
        }
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => "User".to_string(),
        }
    }
}

/// Outcome of a federated (OAuth) sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedSignIn {
    pub identity: Identity,
    /// True when the provider created the account during this sign-in.
    pub is_new_user: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> IdentityId {
        IdentityId::new("uid-1").unwrap()
    }

    #[test]
    fn display_name_wins_when_present() {
        let identity = Identity::new(id(), "ada@example.com", Some("Ada".to_string()));
        assert_eq!(identity.display_name_or_fallback(), "Ada");
    }

    #[test]
    fn falls_back_to_email_local_part() {
        let identity = Identity::new(id(), "grace@example.com", None);
        assert_eq!(identity.display_name_or_fallback(), "grace");
    }

    #[test]
    fn falls_back_to_user_when_email_has_no_local_part() {
        let identity = Identity::new(id(), "", None);
        assert_eq!(identity.display_name_or_fallback(), "User");
    }

    #[test]
    fn blank_display_name_is_treated_as_missing() {
        let identity = Identity::new(id(), "alan@example.com", Some(" ".to_string()));
        assert_eq!(identity.display_name(), None);
        assert_eq!(identity.display_name_or_fallback(), "alan");
    }
}
