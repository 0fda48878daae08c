//! Authentication domain.
//!
//! These types have **no external dependencies** - the identity provider,
//! document store, local storage and biometric evaluator all populate or
//! consume them through the ports.
//!
//! The interesting part is [`SessionState`]: a plain value that the
//! controller mutates in response to its input events, and whose
//! [`SessionState::screen`] method is the single screen decision.

mod credential;
mod errors;
mod identity;
mod screen;
mod session_state;
mod sign_up;

pub use credential::RememberedCredential;
pub use errors::{AuthError, ProviderError, ProviderErrorKind};
pub use identity::{FederatedSignIn, Identity};
pub use screen::ScreenState;
pub use session_state::SessionState;
pub use sign_up::{validate_email, SignUpForm, MIN_PASSWORD_LENGTH};
