//! Biometric challenge errors.

use thiserror::Error;

/// Why a biometric challenge did not succeed.
///
/// Every variant leaves credential entry available as a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BiometricError {
    /// The device cannot perform a biometric match.
    #[error("Biometric authentication is not available on this device")]
    Unavailable,

    /// The platform rejected the match.
    #[error("Biometric authentication failed: {reason}")]
    Failed { reason: String },

    /// The platform dismissed the prompt (app backgrounded, user cancelled).
    #[error("Biometric authentication was cancelled")]
    Cancelled,

    /// Another challenge is still awaiting its result.
    #[error("A biometric challenge is already in progress")]
    ChallengeInProgress,

    /// No remembered credential exists to unlock.
    #[error("Biometric sign-in has not been set up on this device")]
    NotEnrolled,
}

impl BiometricError {
    /// Creates a failed-match error with the platform's reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        BiometricError::Failed {
            reason: reason.into(),
        }
    }

    /// Returns true if the prompt can simply be shown again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BiometricError::Failed { .. } | BiometricError::Cancelled
        )
    }
}
