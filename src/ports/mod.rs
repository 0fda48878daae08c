//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the auth session controller and the outside world. Adapters implement
//! these ports.
//!
//! - `IdentityClient` - remote identity provider (password, federated,
//!   sign-out, identity-changed stream)
//! - `ProfileStore` - remote document store for user profiles
//! - `CredentialStore` - device-local remembered credential
//! - `BiometricGate` - platform biometric capability and challenge

mod biometric_gate;
mod credential_store;
mod identity_client;
mod profile_store;

pub use biometric_gate::BiometricGate;
pub use credential_store::{CredentialStore, CredentialStoreError};
pub use identity_client::{IdentityClient, IdentityListener, Subscription};
pub use profile_store::{ProfileStore, ProfileStoreError};
