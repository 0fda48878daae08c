//! Integration tests for the authentication state machine.
//!
//! These tests drive `AuthSessionController` end to end through in-memory
//! adapters:
//! 1. Launch sequencing and the screen decision
//! 2. Sign-up validation and the concurrency guard
//! 3. Federated partial failure, relaunch and profile retry
//! 4. Biometric enrollment, sign-out and the returning-user challenge
//!
//! A "relaunch" is a new controller over the same provider and stores.

use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use authflow::adapters::{
    ExclusiveBiometricGate, FileCredentialStore, InMemoryCredentialStore, InMemoryIdentityClient,
    InMemoryProfileStore, ScriptedBiometricGate,
};
use authflow::application::{
    AuthSessionController, ControllerSettings, EnrollmentOutcome, LaunchSequencer,
};
use authflow::domain::auth::{AuthError, RememberedCredential, ScreenState, SignUpForm};
use authflow::domain::biometric::{BiometricError, Capability};
use authflow::domain::foundation::ValidationError;
use authflow::ports::{CredentialStore, ProfileStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Everything that outlives a single app process.
struct Device {
    identity: Arc<InMemoryIdentityClient>,
    profiles: InMemoryProfileStore,
    credentials: Arc<dyn CredentialStore>,
    gate: Arc<ScriptedBiometricGate>,
}

impl Device {
    fn new(identity: InMemoryIdentityClient) -> Self {
        Self::with_credentials(identity, Arc::new(InMemoryCredentialStore::new()))
    }

    fn with_credentials(
        identity: InMemoryIdentityClient,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            identity: Arc::new(identity),
            profiles: InMemoryProfileStore::new(),
            credentials,
            gate: Arc::new(
                ScriptedBiometricGate::new(Capability::FaceMatch)
                    .with_latency(Duration::from_millis(30)),
            ),
        }
    }

    fn boot(&self) -> AuthSessionController {
        AuthSessionController::new(
            self.identity.clone(),
            Arc::new(self.profiles.clone()),
            self.credentials.clone(),
            Arc::new(ExclusiveBiometricGate::new(self.gate.clone())),
            ControllerSettings::default(),
        )
    }

    async fn launch(&self) -> AuthSessionController {
        let controller = self.boot();
        LaunchSequencer::new(Duration::ZERO)
            .run(&controller)
            .await
            .unwrap();
        controller
    }
}

fn secret(s: &str) -> SecretString {
    SecretString::new(s.to_string())
}

fn form() -> SignUpForm {
    SignUpForm::new("Grace Hopper", "grace@example.com")
}

async fn sign_up_and_enroll(controller: &AuthSessionController) {
    controller.dismiss_onboarding();
    controller
        .sign_up_with_password(&form(), &secret("hunter22"), &secret("hunter22"))
        .await
        .unwrap();
    assert_eq!(controller.screen(), ScreenState::BiometricEnrollment);

    let outcome = controller.complete_biometric_enrollment(true).await.unwrap();
    assert_eq!(outcome, EnrollmentOutcome::Enrolled);
    assert_eq!(controller.screen(), ScreenState::Authenticated);
}

// =============================================================================
// Sign-up validation
// =============================================================================

#[tokio::test]
async fn short_password_is_rejected_without_network_call() {
    let device = Device::new(InMemoryIdentityClient::new());
    let controller = device.launch().await;

    let err = controller
        .sign_up_with_password(&form(), &secret("abc"), &secret("abc"))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::from(ValidationError::too_short("password", 6)));
    assert_eq!(err.to_string(), "Password must be at least 6 characters");
    assert_eq!(device.identity.registration_count(), 0);
    assert_eq!(device.profiles.write_attempts(), 0);
}

#[tokio::test]
async fn mismatched_confirmation_is_rejected() {
    let device = Device::new(InMemoryIdentityClient::new());
    let controller = device.launch().await;

    let err = controller
        .sign_up_with_password(&form(), &secret("abcdef"), &secret("abcxyz"))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::from(ValidationError::mismatch("confirm_password")));
    assert_eq!(device.identity.registration_count(), 0);
}

#[tokio::test]
async fn concurrent_sign_up_is_rejected_with_operation_in_progress() {
    let device = Device::new(
        InMemoryIdentityClient::new().with_latency(Duration::from_millis(50)),
    );
    let controller = device.launch().await;
    let other = SignUpForm::new("Alan Turing", "alan@example.com");

    let first_form = form();
    let (first_pw, first_confirm) = (secret("hunter22"), secret("hunter22"));
    let (second_pw, second_confirm) = (secret("enigma42"), secret("enigma42"));

    let (first, second) = tokio::join!(
        controller.sign_up_with_password(&first_form, &first_pw, &first_confirm),
        controller.sign_up_with_password(&other, &second_pw, &second_confirm),
    );

    assert_eq!(first, Ok(()));
    assert_eq!(second, Err(AuthError::OperationInProgress));
    assert_eq!(device.identity.registration_count(), 1);
    assert_eq!(device.profiles.document_count().await, 1);
}

// =============================================================================
// Federated sign-in
// =============================================================================

#[tokio::test]
async fn federated_partial_failure_is_retried_after_relaunch_without_new_identity() {
    let device = Device::new(
        InMemoryIdentityClient::new().with_federated_account("lin@gmail.com", "Lin Chen"),
    );
    let controller = device.launch().await;
    device.profiles.set_fail_writes(true);

    let err = controller
        .sign_in_with_federated_provider()
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::ProfileWrite { .. }));
    assert_eq!(device.identity.registration_count(), 1);

    // App is killed before the write is ever confirmed
    drop(controller);
    device.profiles.set_fail_writes(false);

    let controller = device.launch().await;
    let identity = controller.current_user().expect("provider kept the session");
    controller.retry_profile_write().await.unwrap();
    controller.retry_profile_write().await.unwrap();

    let profile = device.profiles.get(identity.id()).await.unwrap().unwrap();
    assert_eq!(profile.full_name(), "Lin Chen");
    assert_eq!(device.profiles.document_count().await, 1);
    assert_eq!(device.identity.registration_count(), 1);
}

#[tokio::test]
async fn returning_federated_user_does_not_touch_profile() {
    let device = Device::new(
        InMemoryIdentityClient::new().with_federated_account("lin@gmail.com", "Lin Chen"),
    );
    let controller = device.launch().await;

    let outcome = controller.sign_in_with_federated_provider().await.unwrap();
    assert!(outcome.is_new_user);
    controller.complete_biometric_enrollment(false).await.unwrap();
    controller.sign_out().await.unwrap();
    let writes = device.profiles.write_attempts();

    let outcome = controller.sign_in_with_federated_provider().await.unwrap();

    assert!(!outcome.is_new_user);
    assert_eq!(device.profiles.write_attempts(), writes);
    assert_eq!(device.identity.registration_count(), 1);
    assert_eq!(controller.screen(), ScreenState::BiometricEnrollment);
}

// =============================================================================
// Biometric challenge and sign-out
// =============================================================================

#[tokio::test]
async fn sign_out_then_relaunch_offers_biometric_challenge() {
    let device = Device::new(InMemoryIdentityClient::new());
    let controller = device.launch().await;
    sign_up_and_enroll(&controller).await;

    controller.sign_out().await.unwrap();
    assert_eq!(controller.screen(), ScreenState::BiometricChallenge);
    drop(controller);

    let controller = device.launch().await;
    assert_eq!(controller.screen(), ScreenState::BiometricChallenge);

    controller.evaluate_biometric_challenge().await.unwrap();

    assert_eq!(controller.screen(), ScreenState::Authenticated);
    assert_eq!(
        controller.current_user().unwrap().email(),
        "grace@example.com"
    );
    assert!(device.identity.current_identity().is_none());
}

#[tokio::test]
async fn declined_challenge_never_returns_on_relaunch() {
    let device = Device::new(InMemoryIdentityClient::new());
    let controller = device.launch().await;
    sign_up_and_enroll(&controller).await;
    controller.sign_out().await.unwrap();
    drop(controller);

    let controller = device.launch().await;
    assert_eq!(controller.screen(), ScreenState::BiometricChallenge);

    controller.decline_biometric_challenge().await.unwrap();
    assert_eq!(controller.screen(), ScreenState::CredentialEntry);
    assert!(device.credentials.get().await.unwrap().is_none());
    drop(controller);

    let controller = device.launch().await;
    assert_ne!(controller.screen(), ScreenState::BiometricChallenge);
    assert_eq!(controller.screen(), ScreenState::Onboarding);
}

#[tokio::test]
async fn failed_challenge_keeps_user_on_challenge_screen() {
    let device = Device::new(InMemoryIdentityClient::new());
    let controller = device.launch().await;
    sign_up_and_enroll(&controller).await;
    controller.sign_out().await.unwrap();
    device.gate.push_outcome(Err(BiometricError::failed("No match")));

    let err = controller.evaluate_biometric_challenge().await.unwrap_err();

    assert_eq!(err, BiometricError::failed("No match"));
    assert!(controller.current_user().is_none());
    assert_eq!(controller.screen(), ScreenState::BiometricChallenge);
    assert!(controller.last_error().unwrap().offers_credential_fallback());

    controller.evaluate_biometric_challenge().await.unwrap();
    assert_eq!(controller.screen(), ScreenState::Authenticated);
}

#[tokio::test]
async fn overlapping_challenges_fail_fast() {
    let credential = RememberedCredential {
        identity_id: authflow::domain::foundation::IdentityId::new("uid-9").unwrap(),
        email: "ada@example.com".to_string(),
        display_name: "Ada".to_string(),
        biometric_enabled: true,
        onboarding_complete: true,
    };
    let device = Device::with_credentials(
        InMemoryIdentityClient::new(),
        Arc::new(InMemoryCredentialStore::with_credential(credential)),
    );
    let controller = device.launch().await;

    let (first, second) = tokio::join!(
        controller.evaluate_biometric_challenge(),
        controller.evaluate_biometric_challenge(),
    );

    assert_eq!(first, Ok(()));
    assert_eq!(second, Err(BiometricError::ChallengeInProgress));
    assert_eq!(device.gate.evaluation_count(), 1);
}

#[tokio::test]
async fn challenge_dismissed_by_platform_is_offered_again_on_foreground() {
    let credential = RememberedCredential {
        identity_id: authflow::domain::foundation::IdentityId::new("uid-9").unwrap(),
        email: "ada@example.com".to_string(),
        display_name: "Ada".to_string(),
        biometric_enabled: true,
        onboarding_complete: true,
    };
    let device = Device::with_credentials(
        InMemoryIdentityClient::new(),
        Arc::new(InMemoryCredentialStore::with_credential(credential)),
    );
    let controller = device.launch().await;

    // App is backgrounded mid-prompt; the evaluation never resolves
    let abandoned =
        tokio::time::timeout(Duration::from_millis(5), controller.evaluate_biometric_challenge())
            .await;
    assert!(abandoned.is_err());
    assert!(controller.is_loading());
    assert_eq!(
        controller.evaluate_biometric_challenge().await,
        Err(BiometricError::ChallengeInProgress)
    );

    controller.on_app_foreground();

    assert!(!controller.is_loading());
    controller.evaluate_biometric_challenge().await.unwrap();
    assert_eq!(controller.current_user().unwrap().email(), "ada@example.com");
}

// =============================================================================
// Sign-out race safety
// =============================================================================

#[tokio::test]
async fn sign_in_completing_after_sign_out_is_revoked() {
    let device = Device::new(
        InMemoryIdentityClient::new()
            .with_account("ada@example.com", "secret1", Some("Ada"))
            .with_latency(Duration::from_millis(50)),
    );
    let controller = device.launch().await;
    controller.dismiss_onboarding();

    let password = secret("secret1");
    let (signed_in, signed_out) = tokio::join!(
        controller.sign_in_with_password("ada@example.com", &password),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.sign_out().await
        },
    );

    assert_eq!(signed_in, Ok(()));
    assert_eq!(signed_out, Ok(()));
    assert!(device.identity.current_identity().is_none());
    assert!(controller.current_user().is_none());
    assert_eq!(controller.screen(), ScreenState::CredentialEntry);
    assert!(!controller.is_loading());
}

// =============================================================================
// Durable storage
// =============================================================================

#[tokio::test]
async fn remembered_credential_survives_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("remembered_credential.yaml");
    let identity = InMemoryIdentityClient::new();

    let device = Device::with_credentials(identity, Arc::new(FileCredentialStore::new(&path)));
    let controller = device.launch().await;
    sign_up_and_enroll(&controller).await;
    controller.sign_out().await.unwrap();
    drop(controller);
    assert!(path.exists());

    let device = Device::with_credentials(
        InMemoryIdentityClient::new(),
        Arc::new(FileCredentialStore::new(&path)),
    );
    let controller = device.launch().await;

    assert_eq!(controller.screen(), ScreenState::BiometricChallenge);
    controller.evaluate_biometric_challenge().await.unwrap();
    assert_eq!(
        controller.current_user().unwrap().display_name(),
        Some("Grace Hopper")
    );
}
