//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AUTHFLOW` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment yields a usable config.
//!
//! # Example
//!
//! ```no_run
//! use authflow::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Splash runs for {:?}", config.launch.splash_delay());
//! ```

mod auth;
mod biometric;
mod error;
mod launch;
mod storage;

pub use auth::AuthConfig;
pub use biometric::BiometricConfig;
pub use error::{ConfigError, ValidationError};
pub use launch::LaunchConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Splash delay before the first screen decision
    #[serde(default)]
    pub launch: LaunchConfig,

    /// Password policy
    #[serde(default)]
    pub auth: AuthConfig,

    /// Biometric prompt texts
    #[serde(default)]
    pub biometric: BiometricConfig,

    /// Remembered credential location
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AUTHFLOW` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AUTHFLOW__LAUNCH__SPLASH_DELAY_MS=1000` -> `launch.splash_delay_ms = 1000`
    /// - `AUTHFLOW__STORAGE__CREDENTIAL_PATH=...` -> `storage.credential_path = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AUTHFLOW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.launch.validate()?;
        self.auth.validate()?;
        self.biometric.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("AUTHFLOW__LAUNCH__SPLASH_DELAY_MS");
        env::remove_var("AUTHFLOW__AUTH__MIN_PASSWORD_LENGTH");
        env::remove_var("AUTHFLOW__BIOMETRIC__CHALLENGE_REASON");
        env::remove_var("AUTHFLOW__STORAGE__CREDENTIAL_PATH");
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.launch.splash_delay_ms, 2500);
        assert_eq!(config.auth.min_password_length, 6);
        assert_eq!(config.biometric.challenge_reason, "Unlock your account");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("AUTHFLOW__LAUNCH__SPLASH_DELAY_MS", "100");
        env::set_var("AUTHFLOW__AUTH__MIN_PASSWORD_LENGTH", "10");
        env::set_var("AUTHFLOW__STORAGE__CREDENTIAL_PATH", "/tmp/cred.yaml");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.launch.splash_delay_ms, 100);
        assert_eq!(config.auth.min_password_length, 10);
        assert_eq!(config.storage.credential_path, PathBuf::from("/tmp/cred.yaml"));
    }

    #[test]
    fn test_validate_rejects_weak_password_policy() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("AUTHFLOW__AUTH__MIN_PASSWORD_LENGTH", "3");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::PasswordPolicyTooWeak { .. })
        ));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }
}
