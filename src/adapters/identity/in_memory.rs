//! In-memory identity provider.
//!
//! Behaves like a hosted identity backend: accounts keyed by email, one
//! current identity, and listeners that receive the current identity on
//! subscribe and every change afterwards. Listeners are invoked after the
//! internal lock is released so they may call back into the client.
//!
//! # Example
//!
//! ```ignore
//! let client = InMemoryIdentityClient::new()
//!     .with_account("ada@example.com", "secret1", Some("Ada"))
//!     .with_federated_account("ada@gmail.com", "Ada L");
//!
//! client.sign_in("ada@example.com", &SecretString::new("secret1".into())).await?;
//! assert!(client.current_identity().is_some());
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use crate::domain::auth::{FederatedSignIn, Identity, ProviderError, ProviderErrorKind};
use crate::domain::foundation::IdentityId;
use crate::ports::{IdentityClient, IdentityListener, Subscription};

/// Minimum password length the provider itself enforces.
const PROVIDER_MIN_PASSWORD_LENGTH: usize = 6;

/// Account the federated flow signs in as (the "Google account" on the device).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedAccount {
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone)]
struct Account {
    identity: Identity,
    password: Option<String>,
}

#[derive(Debug, Default)]
struct ProviderState {
    accounts: HashMap<String, Account>,
    current: Option<Identity>,
    federated: Option<FederatedAccount>,
    forced_error: Option<ProviderError>,
    reset_requests: Vec<String>,
    registrations: usize,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, IdentityListener)>,
}

/// In-memory identity provider.
pub struct InMemoryIdentityClient {
    state: Mutex<ProviderState>,
    listeners: Arc<Mutex<Listeners>>,
    latency: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

impl InMemoryIdentityClient {
    /// Creates a provider with no accounts and nobody signed in.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ProviderState::default()),
            listeners: Arc::new(Mutex::new(Listeners::default())),
            latency: None,
        }
    }

    /// Registers an email/password account.
    pub fn with_account(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
        display_name: Option<&str>,
    ) -> Self {
        let email = email.into();
        let identity = Identity::new(
            IdentityId::generate(),
            email.clone(),
            display_name.map(str::to_string),
        );
        lock(&self.state).accounts.insert(
            normalize(&email),
            Account {
                identity,
                password: Some(password.into()),
            },
        );
        self
    }

    /// Configures the account the federated flow signs in as. Without one,
    /// federated sign-in behaves as if the user dismissed the prompt.
    pub fn with_federated_account(
        self,
        email: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        lock(&self.state).federated = Some(FederatedAccount {
            email: email.into(),
            display_name: display_name.into(),
        });
        self
    }

    /// Delays every network-bound call, so tests can overlap operations.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Forces all actions to fail with the given error.
    pub fn with_error(self, error: ProviderError) -> Self {
        self.set_error(Some(error));
        self
    }

    /// Sets or clears the forced error at runtime.
    pub fn set_error(&self, error: Option<ProviderError>) {
        lock(&self.state).forced_error = error;
    }

    /// Currently signed-in identity.
    pub fn current_identity(&self) -> Option<Identity> {
        lock(&self.state).current.clone()
    }

    /// Number of accounts the provider holds.
    pub fn account_count(&self) -> usize {
        lock(&self.state).accounts.len()
    }

    /// Number of accounts created through sign-up or federated sign-in.
    pub fn registration_count(&self) -> usize {
        lock(&self.state).registrations
    }

    /// Emails that password resets were sent to.
    pub fn reset_requests(&self) -> Vec<String> {
        lock(&self.state).reset_requests.clone()
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).entries.len()
    }

    async fn simulate_network(&self) -> Result<(), ProviderError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match lock(&self.state).forced_error.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Swaps the current identity and notifies listeners outside the lock.
    fn set_current(&self, identity: Option<Identity>) {
        lock(&self.state).current = identity.clone();

        let listeners: Vec<IdentityListener> = lock(&self.listeners)
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        tracing::debug!(
            "Delivering identity change to {} listener(s): signed_in={}",
            listeners.len(),
            identity.is_some()
        );
        for listener in listeners {
            listener(identity.clone());
        }
    }
}

impl Default for InMemoryIdentityClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityClient for InMemoryIdentityClient {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Identity, ProviderError> {
        self.simulate_network().await?;

        let identity = {
            let state = lock(&self.state);
            let account = state.accounts.get(&normalize(email)).ok_or_else(|| {
                ProviderError::new(
                    ProviderErrorKind::UserNotFound,
                    "There is no user record corresponding to this identifier.",
                )
            })?;
            match &account.password {
                Some(stored) if stored == password.expose_secret() => account.identity.clone(),
                _ => return Err(ProviderError::invalid_credentials()),
            }
        };

        tracing::info!("Provider signed in {}", identity.id());
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
        display_name: &str,
    ) -> Result<Identity, ProviderError> {
        self.simulate_network().await?;

        if password.expose_secret().chars().count() < PROVIDER_MIN_PASSWORD_LENGTH {
            return Err(ProviderError::new(
                ProviderErrorKind::WeakPassword,
                "The password must be 6 characters long or more.",
            ));
        }

        let identity = {
            let mut state = lock(&self.state);
            let key = normalize(email);
            if state.accounts.contains_key(&key) {
                return Err(ProviderError::new(
                    ProviderErrorKind::EmailAlreadyInUse,
                    "The email address is already in use by another account.",
                ));
            }
            let identity = Identity::new(
                IdentityId::generate(),
                email.trim(),
                Some(display_name.to_string()),
            );
            state.accounts.insert(
                key,
                Account {
                    identity: identity.clone(),
                    password: Some(password.expose_secret().clone()),
                },
            );
            state.registrations += 1;
            identity
        };

        tracing::info!("Provider registered {}", identity.id());
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_federated(&self) -> Result<FederatedSignIn, ProviderError> {
        self.simulate_network().await?;

        let result = {
            let mut state = lock(&self.state);
            let federated = state.federated.clone().ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::Cancelled, "The user canceled the sign-in flow.")
            })?;
            let key = normalize(&federated.email);
            match state.accounts.get(&key) {
                Some(account) => FederatedSignIn {
                    identity: account.identity.clone(),
                    is_new_user: false,
                },
                None => {
                    let identity = Identity::new(
                        IdentityId::generate(),
                        federated.email.clone(),
                        Some(federated.display_name.clone()),
                    );
                    state.accounts.insert(
                        key,
                        Account {
                            identity: identity.clone(),
                            password: None,
                        },
                    );
                    state.registrations += 1;
                    FederatedSignIn {
                        identity,
                        is_new_user: true,
                    }
                }
            }
        };

        tracing::info!(
            "Provider federated sign-in for {} (new user: {})",
            result.identity.id(),
            result.is_new_user
        );
        self.set_current(Some(result.identity.clone()));
        Ok(result)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        if let Some(error) = lock(&self.state).forced_error.clone() {
            return Err(error);
        }
        self.set_current(None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        self.simulate_network().await?;

        let mut state = lock(&self.state);
        let key = normalize(email);
        if !state.accounts.contains_key(&key) {
            return Err(ProviderError::new(
                ProviderErrorKind::UserNotFound,
                "There is no user record corresponding to this identifier.",
            ));
        }
        state.reset_requests.push(key);
        Ok(())
    }

    fn subscribe(&self, listener: IdentityListener) -> Subscription {
        let id = {
            let mut listeners = lock(&self.listeners);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, listener.clone()));
            id
        };

        let current = lock(&self.state).current.clone();
        listener(current);

        let registry: Weak<Mutex<Listeners>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                lock(&registry).entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }
}
