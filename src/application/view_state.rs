//! Observable snapshot handed to the presentation layer.

use crate::domain::auth::{AuthError, Identity, ScreenState};

/// Everything a screen needs to render, published on every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub screen: ScreenState,
    /// True while a provider call, profile write or biometric prompt is
    /// awaiting its result.
    pub is_loading: bool,
    /// Error of the most recent failed action, cleared when the next
    /// action starts.
    pub last_error: Option<AuthError>,
    pub current_user: Option<Identity>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            screen: ScreenState::Launching,
            is_loading: false,
            last_error: None,
            current_user: None,
        }
    }
}

impl ViewState {
    /// Message to show under the form, if any.
    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(ToString::to_string)
    }
}
