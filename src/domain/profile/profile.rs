//! User profile document.
//!
//! Created exactly once per identity, at first successful sign-up (or first
//! federated sign-in). `identity_id` never changes; `updated_at` is refreshed
//! on every mutation.

use serde::{Deserialize, Serialize};

use crate::domain::auth::Identity;
use crate::domain::foundation::{IdentityId, Timestamp};

/// Profile document as stored in the remote document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    identity_id: IdentityId,
    full_name: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_of_birth: Option<String>,
    biometric_enabled: bool,
    onboarding_complete: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Profile {
    /// Creates a fresh profile with biometrics off and onboarding pending.
    pub fn new(identity_id: IdentityId, full_name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            identity_id,
            full_name: full_name.into(),
            email: email.into(),
            phone: None,
            date_of_birth: None,
            biometric_enabled: false,
            onboarding_complete: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Derives a profile from a provider identity (federated sign-in, retry
    /// after relaunch).
    pub fn from_identity(identity: &Identity) -> Self {
        Self::new(
            identity.id().clone(),
            identity.display_name_or_fallback(),
            identity.email(),
        )
    }

    /// Sets the optional phone number.
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone.filter(|p| !p.trim().is_empty());
        self
    }

    /// Sets the optional date of birth.
    pub fn with_date_of_birth(mut self, date_of_birth: Option<String>) -> Self {
        self.date_of_birth = date_of_birth.filter(|d| !d.trim().is_empty());
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn identity_id(&self) -> &IdentityId {
        &self.identity_id
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn date_of_birth(&self) -> Option<&str> {
        self.date_of_birth.as_deref()
    }

    pub fn biometric_enabled(&self) -> bool {
        self.biometric_enabled
    }

    pub fn onboarding_complete(&self) -> bool {
        self.onboarding_complete
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Applies a partial update and refreshes `updated_at`.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(full_name) = &update.full_name {
            self.full_name = full_name.clone();
        }
        if let Some(phone) = &update.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(date_of_birth) = &update.date_of_birth {
            self.date_of_birth = Some(date_of_birth.clone());
        }
        if let Some(enabled) = update.biometric_enabled {
            self.biometric_enabled = enabled;
        }
        if let Some(complete) = update.onboarding_complete {
            self.onboarding_complete = complete;
        }
        self.updated_at = Timestamp::now();
    }
}

/// Partial set of profile fields to change.
///
/// Serializes only the fields that are set, matching a document store's
/// merge-update semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biometric_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_complete: Option<bool>,
}

impl ProfileUpdate {
    /// Update written when biometric enrollment is accepted or declined.
    pub fn biometric_settings(enabled: bool, onboarding_complete: bool) -> Self {
        Self {
            biometric_enabled: Some(enabled),
            onboarding_complete: Some(onboarding_complete),
            ..Default::default()
        }
    }

    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_profile() -> Profile {
        Profile::new(IdentityId::new("uid-1").unwrap(), "Ada Lovelace", "ada@example.com")
    }

    #[test]
    fn new_profile_starts_with_biometrics_off_and_onboarding_pending() {
        let profile = test_profile();
        assert!(!profile.biometric_enabled());
        assert!(!profile.onboarding_complete());
        assert_eq!(profile.created_at(), profile.updated_at());
    }

    #[test]
    fn blank_optional_fields_are_dropped() {
        let profile = test_profile()
            .with_phone(Some("  ".to_string()))
            .with_date_of_birth(Some("1815-12-10".to_string()));
        assert_eq!(profile.phone(), None);
        assert_eq!(profile.date_of_birth(), Some("1815-12-10"));
    }

    #[test]
    fn apply_changes_only_set_fields_and_refreshes_updated_at() {
        let mut profile = test_profile();
        let before = *profile.updated_at();
        std::thread::sleep(std::time::Duration::from_millis(5));

        profile.apply(&ProfileUpdate::biometric_settings(true, true));

        assert!(profile.biometric_enabled());
        assert!(profile.onboarding_complete());
        assert_eq!(profile.full_name(), "Ada Lovelace");
        assert!(profile.updated_at().is_after(&before));
    }

    #[test]
    fn profile_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(test_profile()).unwrap();
        assert_eq!(json["identityId"], "uid-1");
        assert_eq!(json["biometricEnabled"], false);
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn update_serializes_only_set_fields() {
        let json = serde_json::to_value(ProfileUpdate::biometric_settings(false, true)).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["onboardingComplete"], true);
    }

    #[test]
    fn default_update_is_empty() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(!ProfileUpdate::biometric_settings(true, true).is_empty());
    }
}
