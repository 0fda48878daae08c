//! Authentication policy configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::auth::MIN_PASSWORD_LENGTH;

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Minimum password length enforced before any network call
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// The policy may be tightened but never loosened below the provider's
    /// own minimum.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_password_length < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordPolicyTooWeak {
                min: MIN_PASSWORD_LENGTH,
                actual: self.min_password_length,
            });
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
        }
    }
}

fn default_min_password_length() -> usize {
    MIN_PASSWORD_LENGTH
}
