//! Biometric capability reported by the device.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of biometric match the device can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// No biometric hardware, or none enrolled on the device.
    #[default]
    Unavailable,
    FaceMatch,
    FingerprintMatch,
}

impl Capability {
    /// Returns true if a challenge can be attempted at all.
    pub fn is_available(&self) -> bool {
        !matches!(self, Capability::Unavailable)
    }

    /// Human-readable name used in prompts ("Use Face ID", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Capability::FaceMatch => "Face ID",
            Capability::FingerprintMatch => "Fingerprint",
            Capability::Unavailable => "Biometric",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
