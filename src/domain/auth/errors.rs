//! Authentication error taxonomy.
//!
//! Every controller action returns one of these. Nothing is retried
//! automatically; retry is always the caller's decision.

use thiserror::Error;

use crate::domain::biometric::BiometricError;
use crate::domain::foundation::{IdentityId, ValidationError};

/// Category of a remote identity provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    InvalidCredentials,
    EmailAlreadyInUse,
    WeakPassword,
    UserNotFound,
    NetworkUnreachable,
    RateLimited,
    Cancelled,
    Other,
}

/// Failure reported by the identity provider.
///
/// Displays the provider's message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            ProviderErrorKind::InvalidCredentials,
            "The password is invalid or the user does not have a password.",
        )
    }

    pub fn network_unreachable() -> Self {
        Self::new(
            ProviderErrorKind::NetworkUnreachable,
            "A network error has occurred. Check your connection and try again.",
        )
    }
}

/// Errors surfaced by the auth session controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Local input check failed; no network call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The identity provider rejected or could not complete the request.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The identity exists but its profile document could not be written.
    /// Retry the write alone; do not register again.
    #[error("Account created, but saving the profile failed: {message}")]
    ProfileWrite {
        identity_id: IdentityId,
        message: String,
    },

    #[error(transparent)]
    Biometric(#[from] BiometricError),

    /// Rejected because another profile-affecting action is still running.
    #[error("Another sign-in operation is already in progress")]
    OperationInProgress,

    /// Device-local credential storage failed.
    #[error("Local credential storage failed: {0}")]
    CredentialStore(String),

    /// The action needs a signed-in identity.
    #[error("No user is signed in")]
    NotSignedIn,

    /// Enrollment was completed while no enrollment was pending.
    #[error("Biometric enrollment is not pending")]
    EnrollmentNotPending,
}

impl AuthError {
    pub fn profile_write(identity_id: IdentityId, message: impl Into<String>) -> Self {
        AuthError::ProfileWrite {
            identity_id,
            message: message.into(),
        }
    }

    /// Returns true if the user can fix this by correcting their input.
    pub fn is_validation(&self) -> bool {
        matches!(self, AuthError::Validation(_))
    }

    /// Returns true if credential entry is the right fallback screen.
    pub fn offers_credential_fallback(&self) -> bool {
        matches!(self, AuthError::Biometric(_))
    }
}
