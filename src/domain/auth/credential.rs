//! Locally remembered credential enabling biometric fast-path sign-in.

use serde::{Deserialize, Serialize};

use super::Identity;
use crate::domain::foundation::IdentityId;

/// Record kept in device-local storage while a user has opted into
/// biometric re-authentication.
///
/// Its presence implies a prior successful sign-up or sign-in by `email`.
/// It survives sign-out; only declining a biometric challenge clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedCredential {
    pub identity_id: IdentityId,
    pub email: String,
    pub display_name: String,
    pub biometric_enabled: bool,
    pub onboarding_complete: bool,
}

impl RememberedCredential {
    /// Captures the signed-in identity after a successful enrollment.
    pub fn enrolled(identity: &Identity) -> Self {
        Self {
            identity_id: identity.id().clone(),
            email: identity.email().to_string(),
            display_name: identity.display_name_or_fallback(),
            biometric_enabled: true,
            onboarding_complete: true,
        }
    }

    /// Rebuilds the identity this credential vouches for.
    pub fn to_identity(&self) -> Identity {
        Identity::new(
            self.identity_id.clone(),
            self.email.clone(),
            Some(self.display_name.clone()),
        )
    }

    /// Case-insensitive email match.
    pub fn belongs_to(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}
