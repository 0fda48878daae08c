//! Identity client port - the remote identity provider.
//!
//! The provider is the only authority on "who is signed in". Action
//! methods report success or failure, but the signed-in identity itself
//! reaches the controller exclusively through the subscription stream.

use async_trait::async_trait;
use secrecy::SecretString;
use std::fmt;
use std::sync::Arc;

use crate::domain::auth::{FederatedSignIn, Identity, ProviderError};

/// Callback invoked with every identity snapshot.
pub type IdentityListener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// Handle returned by `IdentityClient::subscribe`.
///
/// Dropping it (or calling `unsubscribe`) stops delivery.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to cancel.
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Remote identity provider.
///
/// # Contract
///
/// Implementations must:
/// - Deliver the current identity to a new listener immediately, then every
///   change afterwards, in order
/// - Deliver the new identity to listeners before the action that caused it
///   returns
/// - Never retry on their own; report failures as `ProviderError`
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Email/password sign-in.
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Identity, ProviderError>;

    /// Registers a new email/password account and signs it in.
    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        display_name: &str,
    ) -> Result<Identity, ProviderError>;

    /// OAuth federated sign-in (e.g. Google).
    async fn sign_in_federated(&self) -> Result<FederatedSignIn, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Sends a password reset email.
    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError>;

    /// Subscribes to identity changes.
    fn subscribe(&self, listener: IdentityListener) -> Subscription;
}
