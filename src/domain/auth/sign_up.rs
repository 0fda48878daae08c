//! Sign-up form and local validation.
//!
//! Validation runs before any network call so the messages are
//! deterministic and testable offline.

use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{IdentityId, ValidationError};
use crate::domain::profile::Profile;

/// Minimum password length accepted locally.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Profile fields collected by the sign-up screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
}

impl SignUpForm {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Checks, in order: non-empty name, email contains `@`, password
    /// length, password confirmation.
    pub fn validate(
        &self,
        password: &SecretString,
        confirm_password: &SecretString,
        min_password_length: usize,
    ) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::empty_field_with(
                "full_name",
                "Please enter your full name",
            ));
        }

        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ValidationError::invalid_format(
                "email",
                "Please enter a valid email",
            ));
        }

        let password = password.expose_secret();
        if password.chars().count() < min_password_length {
            return Err(ValidationError::too_short("password", min_password_length));
        }

        if password != confirm_password.expose_secret() {
            return Err(ValidationError::mismatch("confirm_password"));
        }

        Ok(())
    }

    /// Builds the profile document for the identity the provider created.
    pub fn to_profile(&self, identity_id: IdentityId) -> Profile {
        Profile::new(identity_id, self.full_name.trim(), self.email.trim())
            .with_phone(self.phone.clone())
            .with_date_of_birth(self.date_of_birth.clone())
    }
}

/// Stricter email check used before sending a password reset:
/// `local@domain.tld` with a TLD of at least two letters.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::empty_field_with(
            "email",
            "Please enter your email address",
        ));
    }

    let invalid = || ValidationError::invalid_format("email", "Please enter a valid email address");

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    if !local_ok {
        return Err(invalid());
    }

    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    let tld_ok = (2..=64).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic());
    if !host_ok || !tld_ok {
        return Err(invalid());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string())
    }

    fn form() -> SignUpForm {
        SignUpForm::new("Ada Lovelace", "ada@example.com")
    }

    #[test]
    fn valid_form_passes() {
        assert!(form()
            .validate(&secret("abcdef"), &secret("abcdef"), MIN_PASSWORD_LENGTH)
            .is_ok());
    }

    #[test]
    fn empty_name_is_rejected_first() {
        let form = SignUpForm::new("  ", "not-an-email");
        let err = form
            .validate(&secret("a"), &secret("b"), MIN_PASSWORD_LENGTH)
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter your full name");
    }

    #[test]
    fn email_without_at_is_rejected() {
        let form = SignUpForm::new("Ada", "ada.example.com");
        let err = form
            .validate(&secret("abcdef"), &secret("abcdef"), MIN_PASSWORD_LENGTH)
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email");
    }

    #[test]
    fn short_password_is_rejected_even_when_confirmed() {
        let err = form()
            .validate(&secret("abc"), &secret("abc"), MIN_PASSWORD_LENGTH)
            .unwrap_err();
        assert_eq!(err, ValidationError::too_short("password", 6));
    }

    #[test]
    fn password_length_counts_characters_not_bytes() {
        assert!(form()
            .validate(&secret("ééééé1"), &secret("ééééé1"), MIN_PASSWORD_LENGTH)
            .is_ok());
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let err = form()
            .validate(&secret("abcdef"), &secret("abcxyz"), MIN_PASSWORD_LENGTH)
            .unwrap_err();
        assert_eq!(err, ValidationError::mismatch("confirm_password"));
    }

    #[test]
    fn to_profile_trims_and_carries_optional_fields() {
        let mut form = SignUpForm::new(" Ada ", "ada@example.com ");
        form.phone = Some("+44 20 0000 0000".to_string());
        let profile = form.to_profile(IdentityId::new("uid-1").unwrap());
        assert_eq!(profile.full_name(), "Ada");
        assert_eq!(profile.email(), "ada@example.com");
        assert_eq!(profile.phone(), Some("+44 20 0000 0000"));
    }

    #[test]
    fn validate_email_accepts_common_addresses() {
        assert!(validate_email("ada.lovelace+test@mail.example.co").is_ok());
    }

    #[test]
    fn validate_email_rejects_malformed_addresses() {
        for email in ["", "ada", "ada@", "@example.com", "ada@example", "ada@example.c", "ada@exa mple.com"] {
            assert!(validate_email(email).is_err(), "{} should be rejected", email);
        }
    }
}
