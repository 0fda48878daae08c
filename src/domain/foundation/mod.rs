//! Foundation module - Shared domain primitives.
//!
//! Contains the identifier, timestamp and validation types shared by the
//! auth, profile and biometric domains.

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::IdentityId;
pub use timestamp::Timestamp;
