//! Biometric Gate Adapters
//!
//! - **ScriptedBiometricGate** - Replays queued outcomes (testing/development)
//! - **ExclusiveBiometricGate** - Wraps any gate and rejects overlapping challenges

mod exclusive;
mod scripted;

pub use exclusive::ExclusiveBiometricGate;
pub use scripted::ScriptedBiometricGate;
