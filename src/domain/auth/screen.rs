//! Screen shown to the user.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single "what screen is shown" decision.
///
/// Variants are listed in priority order: when several conditions hold,
/// the earlier one wins (see `SessionState::screen`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenState {
    Launching,
    BiometricChallenge,
    Onboarding,
    CredentialEntry,
    BiometricEnrollment,
    Authenticated,
}

impl ScreenState {
    /// Returns true for screens that require a signed-in identity.
    pub fn is_signed_in(&self) -> bool {
        matches!(
            self,
            ScreenState::BiometricEnrollment | ScreenState::Authenticated
        )
    }
}

impl fmt::Display for ScreenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScreenState::Launching => "launching",
            ScreenState::BiometricChallenge => "biometric_challenge",
            ScreenState::Onboarding => "onboarding",
            ScreenState::CredentialEntry => "credential_entry",
            ScreenState::BiometricEnrollment => "biometric_enrollment",
            ScreenState::Authenticated => "authenticated",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_in_screens() {
        assert!(ScreenState::Authenticated.is_signed_in());
        assert!(ScreenState::BiometricEnrollment.is_signed_in());
        assert!(!ScreenState::BiometricChallenge.is_signed_in());
        assert!(!ScreenState::Launching.is_signed_in());
    }

    #[test]
    fn display_is_snake_case() {
        assert_eq!(ScreenState::CredentialEntry.to_string(), "credential_entry");
    }
}
