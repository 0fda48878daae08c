//! Scripted biometric gate for tests and the demo binary.
//!
//! Reports a fixed capability and answers each `evaluate` with the next
//! queued outcome. An empty queue means the match succeeds.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::domain::biometric::{BiometricError, Capability};
use crate::ports::BiometricGate;

#[derive(Debug)]
pub struct ScriptedBiometricGate {
    capability: Capability,
    outcomes: Mutex<VecDeque<Result<(), BiometricError>>>,
    reasons: Mutex<Vec<String>>,
    latency: Option<Duration>,
    evaluations: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedBiometricGate {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            outcomes: Mutex::new(VecDeque::new()),
            reasons: Mutex::new(Vec::new()),
            latency: None,
            evaluations: AtomicUsize::new(0),
        }
    }

    /// A device with no biometric hardware.
    pub fn unavailable() -> Self {
        Self::new(Capability::Unavailable)
    }

    /// Delays every evaluation, simulating the user looking at the prompt.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queues the outcome of the next unanswered evaluation.
    pub fn push_outcome(&self, outcome: Result<(), BiometricError>) {
        lock(&self.outcomes).push_back(outcome);
    }

    pub fn with_outcome(self, outcome: Result<(), BiometricError>) -> Self {
        self.push_outcome(outcome);
        self
    }

    /// Number of evaluations performed so far.
    pub fn evaluation_count(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }

    /// Prompt reasons passed to `evaluate`, oldest first.
    pub fn reasons(&self) -> Vec<String> {
        lock(&self.reasons).clone()
    }
}

#[async_trait]
impl BiometricGate for ScriptedBiometricGate {
    fn capability(&self) -> Capability {
        self.capability
    }

    async fn evaluate(&self, reason: &str) -> Result<(), BiometricError> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        lock(&self.reasons).push(reason.to_string());
        tracing::debug!("Biometric prompt shown: {}", reason);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if !self.capability.is_available() {
            return Err(BiometricError::Unavailable);
        }

        lock(&self.outcomes).pop_front().unwrap_or(Ok(()))
    }
}
