//! Launch sequencing configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound for the splash delay; longer values are a misconfiguration
const MAX_SPLASH_DELAY_MS: u64 = 30_000;

/// Launch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchConfig {
    /// How long the splash presentation runs before the first screen decision
    #[serde(default = "default_splash_delay_ms")]
    pub splash_delay_ms: u64,
}

impl LaunchConfig {
    /// Get the splash delay as Duration
    pub fn splash_delay(&self) -> Duration {
        Duration::from_millis(self.splash_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.splash_delay_ms > MAX_SPLASH_DELAY_MS {
            return Err(ValidationError::InvalidLaunchDelay {
                max_ms: MAX_SPLASH_DELAY_MS,
            });
        }
        Ok(())
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            splash_delay_ms: default_splash_delay_ms(),
        }
    }
}

fn default_splash_delay_ms() -> u64 {
    2500
}
