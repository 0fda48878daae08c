//! Single-flight wrapper around a biometric gate.
//!
//! Platforms allow one pending biometric prompt. A second `evaluate` while
//! the first is unresolved fails fast with `ChallengeInProgress` instead of
//! stacking prompts.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::biometric::{BiometricError, Capability};
use crate::ports::BiometricGate;

pub struct ExclusiveBiometricGate {
    inner: Arc<dyn BiometricGate>,
    in_flight: AtomicBool,
}

impl ExclusiveBiometricGate {
    pub fn new(inner: Arc<dyn BiometricGate>) -> Self {
        Self {
            inner,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Clears the flag even if the evaluation future is dropped mid-prompt.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl BiometricGate for ExclusiveBiometricGate {
    fn capability(&self) -> Capability {
        self.inner.capability()
    }

    async fn evaluate(&self, reason: &str) -> Result<(), BiometricError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Rejected overlapping biometric challenge");
            return Err(BiometricError::ChallengeInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        self.inner.evaluate(reason).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::biometric::ScriptedBiometricGate;
    use std::time::Duration;

    fn slow_gate() -> (Arc<ScriptedBiometricGate>, ExclusiveBiometricGate) {
        let inner = Arc::new(
            ScriptedBiometricGate::new(Capability::FaceMatch)
                .with_latency(Duration::from_millis(50)),
        );
        let gate = ExclusiveBiometricGate::new(inner.clone());
        (inner, gate)
    }

    #[tokio::test]
    async fn second_concurrent_challenge_fails_fast() {
        let (inner, gate) = slow_gate();

        let (first, second) = tokio::join!(gate.evaluate("Unlock"), gate.evaluate("Unlock"));

        assert_eq!(first, Ok(()));
        assert_eq!(second, Err(BiometricError::ChallengeInProgress));
        assert_eq!(inner.evaluation_count(), 1);
    }

    #[tokio::test]
    async fn flag_is_released_after_completion() {
        let (_, gate) = slow_gate();

        gate.evaluate("Unlock").await.unwrap();

        assert!(!gate.is_in_flight());
        assert_eq!(gate.evaluate("Unlock").await, Ok(()));
    }

    #[tokio::test]
    async fn flag_is_released_when_future_is_dropped() {
        let (_, gate) = slow_gate();

        let timed_out =
            tokio::time::timeout(Duration::from_millis(5), gate.evaluate("Unlock")).await;

        assert!(timed_out.is_err());
        assert!(!gate.is_in_flight());
    }

    #[test]
    fn capability_comes_from_inner_gate() {
        let gate = ExclusiveBiometricGate::new(Arc::new(ScriptedBiometricGate::new(
            Capability::FingerprintMatch,
        )));
        assert_eq!(gate.capability(), Capability::FingerprintMatch);
    }
}
