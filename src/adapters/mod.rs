//! Adapters - Implementations of port interfaces.
//!
//! - `identity` - In-memory identity provider with a live identity stream
//! - `profile` - In-memory document store keeping camelCase JSON documents
//! - `credential` - File-backed and in-memory remembered-credential stores
//! - `biometric` - Scripted biometric gate and the single-challenge guard

pub mod biometric;
pub mod credential;
pub mod identity;
pub mod profile;

pub use biometric::{ExclusiveBiometricGate, ScriptedBiometricGate};
pub use credential::{FileCredentialStore, InMemoryCredentialStore};
pub use identity::InMemoryIdentityClient;
pub use profile::InMemoryProfileStore;
