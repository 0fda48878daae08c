//! Biometric prompt configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Text shown in the platform's biometric dialogs
#[derive(Debug, Clone, Deserialize)]
pub struct BiometricConfig {
    /// Reason shown when a returning user unlocks
    #[serde(default = "default_challenge_reason")]
    pub challenge_reason: String,

    /// Leading words of the enrollment reason, followed by the capability label
    #[serde(default = "default_enrollment_reason_prefix")]
    pub enrollment_reason_prefix: String,
}

impl BiometricConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.challenge_reason.trim().is_empty() {
            return Err(ValidationError::MissingRequired("BIOMETRIC__CHALLENGE_REASON"));
        }
        if self.enrollment_reason_prefix.trim().is_empty() {
            return Err(ValidationError::MissingRequired(
                "BIOMETRIC__ENROLLMENT_REASON_PREFIX",
            ));
        }
        Ok(())
    }
}

impl Default for BiometricConfig {
    fn default() -> Self {
        Self {
            challenge_reason: default_challenge_reason(),
            enrollment_reason_prefix: default_enrollment_reason_prefix(),
        }
    }
}

fn default_challenge_reason() -> String {
    "Unlock your account".to_string()
}

fn default_enrollment_reason_prefix() -> String {
    "Set up".to_string()
}
