//! Biometric domain - device capability and challenge outcomes.
//!
//! The actual match happens inside the platform's secure enclave; this
//! module only names what the platform can report back.

mod capability;
mod errors;

pub use capability::Capability;
pub use errors::BiometricError;
