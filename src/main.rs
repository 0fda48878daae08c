//! Authflow demo
//!
//! Walks one device through launch, sign-up, biometric enrollment,
//! sign-out and a biometric unlock on relaunch, logging every screen.
//! The identity provider and document store are in memory; the remembered
//! credential is written to the configured file, so a second run starts at
//! the biometric challenge.

use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use authflow::adapters::{
    ExclusiveBiometricGate, FileCredentialStore, InMemoryIdentityClient, InMemoryProfileStore,
    ScriptedBiometricGate,
};
use authflow::application::{AuthSessionController, ControllerSettings, LaunchSequencer};
use authflow::config::AppConfig;
use authflow::domain::auth::{ScreenState, SignUpForm};
use authflow::domain::biometric::Capability;
use authflow::ports::{BiometricGate, CredentialStore, IdentityClient, ProfileStore};

struct Device {
    identity: Arc<dyn IdentityClient>,
    profiles: Arc<dyn ProfileStore>,
    credentials: Arc<dyn CredentialStore>,
    biometric: Arc<dyn BiometricGate>,
    settings: ControllerSettings,
}

impl Device {
    /// A fresh controller over the same collaborators, as after an app restart.
    fn boot(&self) -> AuthSessionController {
        let controller = AuthSessionController::new(
            self.identity.clone(),
            self.profiles.clone(),
            self.credentials.clone(),
            self.biometric.clone(),
            self.settings.clone(),
        );

        let mut views = controller.subscribe();
        tokio::spawn(async move {
            while views.changed().await.is_ok() {
                let view = views.borrow_and_update().clone();
                tracing::info!(
                    "screen={} loading={} error={:?}",
                    view.screen,
                    view.is_loading,
                    view.error_message()
                );
            }
        });

        controller
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("authflow=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::load()?;
    config.validate()?;

    let device = Device {
        identity: Arc::new(InMemoryIdentityClient::new()),
        profiles: Arc::new(InMemoryProfileStore::new()),
        credentials: Arc::new(FileCredentialStore::new(&config.storage.credential_path)),
        biometric: Arc::new(ExclusiveBiometricGate::new(Arc::new(
            ScriptedBiometricGate::new(Capability::FaceMatch)
                .with_latency(Duration::from_millis(300)),
        ))),
        settings: ControllerSettings::from(&config),
    };

    let controller = device.boot();
    LaunchSequencer::from_config(&config.launch)
        .run(&controller)
        .await?;

    if controller.screen() == ScreenState::BiometricChallenge {
        tracing::info!("Returning user found on disk; unlocking");
        controller.evaluate_biometric_challenge().await?;
        tracing::info!("Unlocked as {:?}", controller.current_user());
        return Ok(());
    }

    controller.dismiss_onboarding();

    let form = SignUpForm::new("Demo User", "demo@example.com");
    let password = SecretString::new("correct-horse".to_string());
    controller
        .sign_up_with_password(&form, &password, &password)
        .await?;

    let outcome = controller.complete_biometric_enrollment(true).await?;
    tracing::info!("Enrollment outcome: {:?}", outcome);

    controller.sign_out().await?;
    drop(controller);

    tracing::info!("Relaunching");
    let controller = device.boot();
    LaunchSequencer::new(Duration::from_millis(500))
        .run(&controller)
        .await?;
    controller.evaluate_biometric_challenge().await?;

    tracing::info!(
        "Finished on {} as {:?}",
        controller.screen(),
        controller.current_user().map(|u| u.display_name_or_fallback())
    );
    Ok(())
}
