//! Domain layer containing the authentication vocabulary and state.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, validation errors)
//! - `auth` - Identities, remembered credentials, sign-up forms, and the
//!   session state that decides which screen is shown
//! - `profile` - The application-owned user profile document
//! - `biometric` - Device biometric capability and challenge errors

pub mod auth;
pub mod biometric;
pub mod foundation;
pub mod profile;
