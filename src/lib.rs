//! Authflow - client-side onboarding and authentication state machine
//!
//! This crate decides which screen a mobile app shows while a user signs
//! up, signs in (password or federated), enrolls in biometric
//! re-authentication and later unlocks with it. Identity, profile storage,
//! local persistence and the biometric evaluator sit behind ports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
