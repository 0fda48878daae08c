//! LaunchSequencer - one-shot timed gate in front of the first screen
//! decision.
//!
//! Holds the `Launching` screen for the splash delay, then completes the
//! controller's launch exactly once. There is no cancellation path: the
//! splash always runs to completion.

use std::time::Duration;
use tokio::task::JoinHandle;

use super::AuthSessionController;
use crate::config::LaunchConfig;
use crate::domain::auth::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchSequencer {
    delay: Duration,
}

impl LaunchSequencer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &LaunchConfig) -> Self {
        Self::new(config.splash_delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the splash, then fires the controller's launch.
    ///
    /// Consumes the sequencer so it can only fire once.
    pub async fn run(self, controller: &AuthSessionController) -> Result<(), AuthError> {
        tracing::debug!("Splash running for {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
        controller.complete_launch().await
    }

    /// Runs the sequencer on its own task. A launch error is already
    /// published on the controller's view state; it is only logged here.
    pub fn spawn(self, controller: AuthSessionController) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(error) = self.run(&controller).await {
                tracing::warn!("Launch completed with error: {}", error);
            }
        })
    }
}

impl Default for LaunchSequencer {
    fn default() -> Self {
        Self::from_config(&LaunchConfig::default())
    }
}
