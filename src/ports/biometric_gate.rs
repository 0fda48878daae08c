//! Biometric gate port - the platform's biometric evaluator.

use async_trait::async_trait;

use crate::domain::biometric::{BiometricError, Capability};

/// Capability check plus single-shot challenge.
///
/// # Contract
///
/// - `capability` never blocks
/// - `evaluate` resolves exactly once, with success or a
///   platform-supplied failure reason
/// - At most one `evaluate` may be pending; a second call fails fast with
///   `BiometricError::ChallengeInProgress` (see `ExclusiveBiometricGate`)
#[async_trait]
pub trait BiometricGate: Send + Sync {
    fn capability(&self) -> Capability;

    /// Prompts the user; `reason` is shown in the system dialog.
    async fn evaluate(&self, reason: &str) -> Result<(), BiometricError>;
}
