//! AuthSessionController - the authentication state machine.
//!
//! Reconciles three asynchronous signals into the single screen decision:
//!
//! - the identity provider's identity-changed stream (sole authority for
//!   "who is signed in")
//! - the device's biometric capability and remembered credential
//! - user actions (sign in, sign up, enroll, sign out, ...)
//!
//! All mutations go through one lock around [`SessionState`]; the lock is
//! never held across an `.await`, and every mutation republishes the
//! [`ViewState`] on a `tokio::sync::watch` channel.
//!
//! # Race safety
//!
//! Network-bound actions capture the session generation when they start.
//! A sign-out bumps the generation, so an action that completes afterwards
//! cannot flip flags on the new session. Biometric challenges carry their
//! own ticket, so a prompt abandoned on foreground cannot settle its
//! replacement.

use secrecy::SecretString;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;

use super::ViewState;
use crate::config::AppConfig;
use crate::domain::auth::{
    validate_email, AuthError, Identity, RememberedCredential, ScreenState, SessionState,
    SignUpForm, MIN_PASSWORD_LENGTH,
};
use crate::domain::biometric::BiometricError;
use crate::domain::foundation::IdentityId;
use crate::domain::profile::{Profile, ProfileUpdate};
use crate::ports::{
    BiometricGate, CredentialStore, IdentityClient, IdentityListener, ProfileStore,
    ProfileStoreError, Subscription,
};

/// Tunables the controller reads from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub min_password_length: usize,
    /// Shown in the system dialog when a returning user unlocks.
    pub challenge_reason: String,
    /// Enrollment dialog reads "<prefix> <capability> authentication for secure access".
    pub enrollment_reason_prefix: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            min_password_length: MIN_PASSWORD_LENGTH,
            challenge_reason: "Unlock your account".to_string(),
            enrollment_reason_prefix: "Set up".to_string(),
        }
    }
}

impl From<&AppConfig> for ControllerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            min_password_length: config.auth.min_password_length,
            challenge_reason: config.biometric.challenge_reason.clone(),
            enrollment_reason_prefix: config.biometric.enrollment_reason_prefix.clone(),
        }
    }
}

/// Result of a federated sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FederatedSignInOutcome {
    pub is_new_user: bool,
}

/// How a biometric enrollment ended. Every variant leaves the user on the
/// authenticated screen with onboarding complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    /// Challenge passed; the credential is remembered for next launch.
    Enrolled,
    /// The user skipped enrollment.
    Declined,
    /// The enrollment challenge failed; biometrics stay off.
    ChallengeFailed(BiometricError),
}

/// Everything guarded by the controller's lock.
#[derive(Debug, Default)]
struct Session {
    state: SessionState,
    last_error: Option<AuthError>,
    /// Profile from a sign-up whose document write failed, kept for retry.
    pending_profile: Option<Profile>,
    /// Biometric flags from an enrollment whose profile update failed.
    pending_settings: Option<(IdentityId, ProfileUpdate)>,
}

impl Session {
    fn view(&self) -> ViewState {
        ViewState {
            screen: self.state.screen(),
            is_loading: self.state.operation_in_flight() || self.state.biometric_challenge_pending(),
            last_error: self.last_error.clone(),
            current_user: self.state.identity().cloned(),
        }
    }

    fn record_error(&mut self, generation: u64, error: &AuthError) {
        if self.state.is_current(generation) {
            self.last_error = Some(error.clone());
        }
    }
}

struct Inner {
    session: Mutex<Session>,
    view: watch::Sender<ViewState>,
    identity: Arc<dyn IdentityClient>,
    profiles: Arc<dyn ProfileStore>,
    credentials: Arc<dyn CredentialStore>,
    biometric: Arc<dyn BiometricGate>,
    settings: ControllerSettings,
    subscription: Mutex<Option<Subscription>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Inner {
    /// Applies `f` to the session and publishes the resulting view.
    fn update<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = lock(&self.session);
        let result = f(&mut session);
        let next = session.view();
        self.view.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
        result
    }

    fn identity_changed(&self, identity: Option<Identity>) {
        tracing::debug!("Identity changed: signed_in={}", identity.is_some());
        self.update(|s| s.state.identity_changed(identity));
    }
}

/// The authentication state machine.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct AuthSessionController {
    inner: Arc<Inner>,
}

impl AuthSessionController {
    /// Creates the controller and subscribes to the identity stream.
    ///
    /// The provider delivers its current identity during construction, so a
    /// session the provider still holds is visible as soon as launch
    /// completes.
    pub fn new(
        identity: Arc<dyn IdentityClient>,
        profiles: Arc<dyn ProfileStore>,
        credentials: Arc<dyn CredentialStore>,
        biometric: Arc<dyn BiometricGate>,
        settings: ControllerSettings,
    ) -> Self {
        let (view, _) = watch::channel(ViewState::default());
        let inner = Arc::new(Inner {
            session: Mutex::new(Session::default()),
            view,
            identity,
            profiles,
            credentials,
            biometric,
            settings,
            subscription: Mutex::new(None),
        });

        let weak: Weak<Inner> = Arc::downgrade(&inner);
        let listener: IdentityListener = Arc::new(move |identity| {
            if let Some(inner) = weak.upgrade() {
                inner.identity_changed(identity);
            }
        });
        let subscription = inner.identity.subscribe(listener);
        *lock(&inner.subscription) = Some(subscription);

        Self { inner }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Observation
    // ─────────────────────────────────────────────────────────────────────────

    /// Receiver that sees every published view state.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.view.subscribe()
    }

    pub fn view(&self) -> ViewState {
        lock(&self.inner.session).view()
    }

    pub fn screen(&self) -> ScreenState {
        lock(&self.inner.session).state.screen()
    }

    pub fn is_loading(&self) -> bool {
        self.view().is_loading
    }

    pub fn last_error(&self) -> Option<AuthError> {
        lock(&self.inner.session).last_error.clone()
    }

    pub fn current_user(&self) -> Option<Identity> {
        lock(&self.inner.session).state.identity().cloned()
    }

    /// Copy of the raw session state.
    pub fn state_snapshot(&self) -> SessionState {
        lock(&self.inner.session).state.clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Launch and lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// First evaluation after the splash. Reads the device capability and
    /// the remembered credential; later calls are no-ops.
    ///
    /// A credential store failure still completes the launch (as if nothing
    /// were remembered) and is reported as the error.
    pub async fn complete_launch(&self) -> Result<(), AuthError> {
        if lock(&self.inner.session).state.launch_complete() {
            tracing::debug!("Launch already complete");
            return Ok(());
        }

        let capability = self.inner.biometric.capability();
        let remembered = self.inner.credentials.get().await.map_err(AuthError::from);

        self.inner.update(|s| {
            let fired = s
                .state
                .complete_launch(capability, remembered.as_ref().ok().cloned().flatten());
            if fired {
                if let Err(error) = &remembered {
                    s.last_error = Some(error.clone());
                }
            }
        });

        match &remembered {
            Ok(credential) => tracing::info!(
                "Launch complete: capability={}, remembered={}, screen={}",
                capability,
                credential.is_some(),
                self.screen()
            ),
            Err(error) => tracing::warn!("Launch completed without remembered credential: {}", error),
        }
        remembered.map(|_| ())
    }

    /// The app returned to the foreground. A biometric prompt the platform
    /// dismissed while backgrounded may be offered again.
    pub fn on_app_foreground(&self) {
        if self.inner.update(|s| s.state.foregrounded()) {
            tracing::debug!("Released dangling biometric challenge on foreground");
        }
    }

    /// Moves past the onboarding screens to credential entry.
    pub fn dismiss_onboarding(&self) {
        self.inner.update(|s| s.state.dismiss_onboarding());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Credential actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Email/password sign-in.
    ///
    /// Does not set the identity itself; it arrives through the provider's
    /// stream. Enrollment is offered unless this device already remembers
    /// the same account.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(), AuthError> {
        let generation = self.begin_operation()?;
        self.offer_enrollment(generation, Some(email));

        let result = match self.inner.identity.sign_in(email, password).await {
            Ok(identity) => {
                self.still_current(generation, &identity).await;
                Ok(())
            }
            Err(error) => {
                tracing::info!("Password sign-in rejected: {}", error);
                self.withdraw_enrollment(generation);
                Err(AuthError::from(error))
            }
        };
        self.finish_operation(generation, result)
    }

    /// Registers a new account and creates its profile document.
    ///
    /// Input is validated before any network call. If the account is created
    /// but the profile write fails, the account stays signed in and
    /// `ProfileWrite` is returned; call [`retry_profile_write`] rather than
    /// signing up again.
    ///
    /// [`retry_profile_write`]: Self::retry_profile_write
    pub async fn sign_up_with_password(
        &self,
        form: &SignUpForm,
        password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<(), AuthError> {
        if let Err(error) =
            form.validate(password, confirm_password, self.inner.settings.min_password_length)
        {
            let error = AuthError::from(error);
            self.inner.update(|s| s.last_error = Some(error.clone()));
            return Err(error);
        }

        let generation = self.begin_operation()?;
        self.offer_enrollment(generation, Some(form.email.trim()));

        let identity = match self
            .inner
            .identity
            .sign_up(form.email.trim(), password, form.full_name.trim())
            .await
        {
            Ok(identity) => identity,
            Err(error) => {
                tracing::info!("Sign-up rejected: {}", error);
                self.withdraw_enrollment(generation);
                return self.finish_operation(generation, Err(AuthError::from(error)));
            }
        };

        if !self.still_current(generation, &identity).await {
            return self.finish_operation(generation, Ok(()));
        }

        let profile = form.to_profile(identity.id().clone());
        let result = self.create_profile(generation, profile).await.map(|_| ());
        self.finish_operation(generation, result)
    }

    /// OAuth federated sign-in.
    ///
    /// A new account gets its profile document created (an existing
    /// document counts as success) and is offered enrollment. A returning
    /// account is treated like a password sign-in.
    pub async fn sign_in_with_federated_provider(
        &self,
    ) -> Result<FederatedSignInOutcome, AuthError> {
        let generation = self.begin_operation()?;
        self.offer_enrollment(generation, None);

        let federated = match self.inner.identity.sign_in_federated().await {
            Ok(federated) => federated,
            Err(error) => {
                tracing::info!("Federated sign-in failed: {}", error);
                self.withdraw_enrollment(generation);
                return self.finish_operation(generation, Err(AuthError::from(error)));
            }
        };

        let outcome = FederatedSignInOutcome {
            is_new_user: federated.is_new_user,
        };
        if !self.still_current(generation, &federated.identity).await {
            return self.finish_operation(generation, Ok(outcome));
        }

        let result = if federated.is_new_user {
            let profile = Profile::from_identity(&federated.identity);
            self.create_profile(generation, profile)
                .await
                .map(|_| outcome)
        } else {
            Ok(outcome)
        };
        self.finish_operation(generation, result)
    }

    /// Re-attempts the profile write for the signed-in identity without
    /// registering again. An existing document counts as success.
    ///
    /// Uses the profile captured by a failed sign-up when there is one,
    /// otherwise one derived from the identity (e.g. after a relaunch).
    /// Biometric flags left over from a failed enrollment write are applied
    /// afterwards.
    pub async fn retry_profile_write(&self) -> Result<(), AuthError> {
        let identity = self.current_user().ok_or(AuthError::NotSignedIn)?;
        let generation = self.begin_operation()?;

        let profile = self
            .inner
            .update(|s| s.pending_profile.take())
            .filter(|p| p.identity_id() == identity.id())
            .unwrap_or_else(|| Profile::from_identity(&identity));

        let existing = match self.inner.profiles.get(identity.id()).await {
            Ok(existing) => existing,
            Err(error) => {
                self.inner.update(|s| {
                    if s.state.is_current(generation) {
                        s.pending_profile = Some(profile);
                    }
                });
                let error = AuthError::profile_write(identity.id().clone(), error.to_string());
                return self.finish_operation(generation, Err(error));
            }
        };

        let result = match existing {
            Some(_) => {
                tracing::info!("Profile for {} already exists", identity.id());
                Ok(())
            }
            None => self.create_profile(generation, profile).await.map(|_| ()),
        };
        let result = match result {
            Ok(()) => self.apply_pending_settings(generation, &identity).await,
            Err(error) => Err(error),
        };
        self.finish_operation(generation, result)
    }

    async fn apply_pending_settings(
        &self,
        generation: u64,
        identity: &Identity,
    ) -> Result<(), AuthError> {
        let Some((owner, update)) = self
            .inner
            .update(|s| s.pending_settings.take())
            .filter(|(owner, _)| owner == identity.id())
        else {
            return Ok(());
        };

        match self.write_biometric_settings(identity, &update).await {
            Ok(()) => {
                tracing::info!("Applied deferred biometric settings for {}", owner);
                Ok(())
            }
            Err(error) => {
                self.inner.update(|s| {
                    if s.state.is_current(generation) {
                        s.pending_settings = Some((owner.clone(), update));
                    }
                });
                Err(AuthError::profile_write(owner, error.to_string()))
            }
        }
    }

    /// Sends a password reset email after checking the address locally.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let generation = self.inner.update(|s| {
            s.last_error = None;
            s.state.generation()
        });

        let result = match validate_email(email) {
            Ok(()) => self
                .inner
                .identity
                .send_password_reset(email.trim())
                .await
                .map_err(AuthError::from),
            Err(error) => Err(AuthError::from(error)),
        };

        if let Err(error) = &result {
            self.inner.update(|s| s.record_error(generation, error));
        } else {
            tracing::info!("Password reset requested");
        }
        result
    }

    /// Signs out at the provider and resets the session.
    ///
    /// The remembered credential survives, so the next launch offers the
    /// biometric challenge again. Actions still in flight are orphaned.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        if let Err(error) = self.inner.identity.sign_out().await {
            let error = AuthError::from(error);
            tracing::warn!("Provider sign-out failed: {}", error);
            self.inner.update(|s| s.last_error = Some(error.clone()));
            return Err(error);
        }

        self.inner.update(|s| {
            s.state.sign_out();
            s.last_error = None;
            s.pending_profile = None;
            s.pending_settings = None;
        });
        tracing::info!("Signed out; screen={}", self.screen());
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Biometric actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Returning-user fast path: on success the remembered identity is
    /// restored locally without consulting the provider.
    ///
    /// Failures leave the identity untouched and are not retried.
    pub async fn evaluate_biometric_challenge(&self) -> Result<(), BiometricError> {
        let started = self.inner.update(|s| {
            s.last_error = None;
            if s.state.is_identity_present() {
                return Ok(None);
            }
            if !s.state.capability().is_available() {
                return Err(BiometricError::Unavailable);
            }
            if s.state.remembered().is_none() {
                return Err(BiometricError::NotEnrolled);
            }
            s.state
                .begin_challenge()
                .map(Some)
                .ok_or(BiometricError::ChallengeInProgress)
        });

        let ticket = match started {
            Ok(Some(ticket)) => ticket,
            Ok(None) => return Ok(()),
            Err(error) => {
                if error != BiometricError::ChallengeInProgress {
                    self.inner
                        .update(|s| s.last_error = Some(AuthError::from(error.clone())));
                }
                return Err(error);
            }
        };

        let reason = self.inner.settings.challenge_reason.clone();
        match self.inner.biometric.evaluate(&reason).await {
            Ok(()) => {
                if self.inner.update(|s| s.state.challenge_succeeded(ticket)) {
                    tracing::info!("Biometric challenge passed; remembered identity restored");
                } else {
                    tracing::debug!("Biometric challenge passed but was superseded");
                }
                Ok(())
            }
            Err(error) => {
                tracing::info!("Biometric challenge failed: {}", error);
                self.inner.update(|s| {
                    if s.state.challenge_failed(ticket) {
                        s.last_error = Some(AuthError::from(error.clone()));
                    }
                });
                Err(error)
            }
        }
    }

    /// Revokes biometric trust: the remembered credential is deleted and
    /// the user falls back to onboarding or credential entry.
    pub async fn decline_biometric_challenge(&self) -> Result<(), AuthError> {
        if let Err(error) = self.inner.credentials.clear().await {
            let error = AuthError::from(error);
            tracing::warn!("Failed to forget remembered credential: {}", error);
            self.inner.update(|s| s.last_error = Some(error.clone()));
            return Err(error);
        }

        self.inner.update(|s| {
            s.state.credential_forgotten();
            s.last_error = None;
        });
        tracing::info!("Biometric challenge declined; remembered credential cleared");
        Ok(())
    }

    /// Finishes the enrollment step that follows a fresh sign-up or
    /// sign-in.
    ///
    /// Accepting runs a fresh challenge; only when it passes is the profile
    /// updated and then the credential remembered. Declining or failing the
    /// challenge records `biometricEnabled = false`. A write failure still
    /// ends the step without remembering a credential; the opt-out is kept
    /// for [`retry_profile_write`].
    ///
    /// [`retry_profile_write`]: Self::retry_profile_write
    pub async fn complete_biometric_enrollment(
        &self,
        accepted: bool,
    ) -> Result<EnrollmentOutcome, AuthError> {
        let (identity, capability) = {
            let session = lock(&self.inner.session);
            let identity = session
                .state
                .identity()
                .cloned()
                .ok_or(AuthError::NotSignedIn)?;
            if !session.state.biometric_setup_pending() {
                return Err(AuthError::EnrollmentNotPending);
            }
            (identity, session.state.capability())
        };
        let generation = self.begin_operation()?;

        let challenge = if accepted {
            let reason = format!(
                "{} {} authentication for secure access",
                self.inner.settings.enrollment_reason_prefix,
                capability.label()
            );
            Some(self.inner.biometric.evaluate(&reason).await)
        } else {
            None
        };

        let enabled = matches!(challenge, Some(Ok(())));
        let update = ProfileUpdate::biometric_settings(enabled, true);
        if let Err(error) = self.write_biometric_settings(&identity, &update).await {
            tracing::warn!("Enrollment profile update failed for {}: {}", identity.id(), error);
            self.inner.update(|s| {
                if s.state.enrollment_finished(generation) {
                    s.pending_settings = Some((
                        identity.id().clone(),
                        ProfileUpdate::biometric_settings(false, true),
                    ));
                }
            });
            let error = AuthError::profile_write(identity.id().clone(), error.to_string());
            return self.finish_operation(generation, Err(error));
        }

        let outcome = match challenge {
            Some(Ok(())) => {
                let credential = RememberedCredential::enrolled(&identity);
                if let Err(error) = self.inner.credentials.set(&credential).await {
                    return self.finish_operation(generation, Err(AuthError::from(error)));
                }
                self.inner.update(|s| {
                    if s.state.is_current(generation) {
                        s.state.credential_remembered(credential);
                    }
                });
                EnrollmentOutcome::Enrolled
            }
            Some(Err(error)) => EnrollmentOutcome::ChallengeFailed(error),
            None => EnrollmentOutcome::Declined,
        };

        self.inner.update(|s| s.state.enrollment_finished(generation));
        tracing::info!("Biometric enrollment finished: {:?}", outcome);
        self.finish_operation(generation, Ok(outcome))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn begin_operation(&self) -> Result<u64, AuthError> {
        self.inner.update(|s| match s.state.begin_operation() {
            Some(generation) => {
                s.last_error = None;
                Ok(generation)
            }
            None => {
                tracing::debug!("Rejected action: another operation is in flight");
                Err(AuthError::OperationInProgress)
            }
        })
    }

    fn finish_operation<T>(
        &self,
        generation: u64,
        result: Result<T, AuthError>,
    ) -> Result<T, AuthError> {
        self.inner.update(|s| {
            if let Err(error) = &result {
                s.record_error(generation, error);
            }
            s.state.finish_operation(generation);
        });
        result
    }

    /// Raised before the provider call so the identity event never lands on
    /// the authenticated screen first. Not raised for an email this device
    /// already remembers.
    fn offer_enrollment(&self, generation: u64, email: Option<&str>) {
        self.inner.update(|s| {
            let known = email.is_some_and(|email| s.state.remembers(email));
            let allowed = s.state.biometric_setup_allowed() && !known;
            s.state.set_setup_pending(generation, allowed);
        });
    }

    fn withdraw_enrollment(&self, generation: u64) {
        self.inner
            .update(|s| s.state.set_setup_pending(generation, false));
    }

    /// Returns false (and signs the provider out again) when the user
    /// signed out while the provider call was in flight.
    async fn still_current(&self, generation: u64, identity: &Identity) -> bool {
        if lock(&self.inner.session).state.is_current(generation) {
            return true;
        }
        tracing::warn!(
            "Sign-in for {} completed after sign-out; revoking it",
            identity.id()
        );
        if let Err(error) = self.inner.identity.sign_out().await {
            tracing::error!("Failed to revoke late sign-in: {}", error);
        }
        false
    }

    /// Updates the biometric flags, creating the document from the identity
    /// if the account never got one.
    async fn write_biometric_settings(
        &self,
        identity: &Identity,
        update: &ProfileUpdate,
    ) -> Result<(), ProfileStoreError> {
        match self.inner.profiles.update(identity.id(), update).await {
            Err(ProfileStoreError::NotFound(_)) => {
                tracing::info!("No profile for {}; creating one", identity.id());
                let mut profile = Profile::from_identity(identity);
                profile.apply(update);
                self.inner.profiles.create(&profile).await
            }
            other => other,
        }
    }

    /// Creates the profile document; `AlreadyExists` counts as success.
    /// Returns true if a new document was written.
    ///
    /// On failure the enrollment offer is withdrawn and the profile is kept
    /// for [`retry_profile_write`](Self::retry_profile_write).
    async fn create_profile(&self, generation: u64, profile: Profile) -> Result<bool, AuthError> {
        let identity_id = profile.identity_id().clone();
        match self.inner.profiles.create(&profile).await {
            Ok(()) => {
                tracing::info!("Profile created for {}", identity_id);
                self.inner.update(|s| {
                    let allowed = s.state.biometric_setup_allowed();
                    s.state.set_setup_pending(generation, allowed);
                });
                Ok(true)
            }
            Err(ProfileStoreError::AlreadyExists(_)) => {
                tracing::info!("Profile for {} already exists", identity_id);
                Ok(false)
            }
            Err(error) => {
                tracing::warn!("Profile write failed for {}: {}", identity_id, error);
                self.inner.update(|s| {
                    if s.state.set_setup_pending(generation, false) {
                        s.pending_profile = Some(profile);
                    }
                });
                Err(AuthError::profile_write(identity_id, error.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for AuthSessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSessionController")
            .field("view", &self.view())
            .finish()
    }
}
