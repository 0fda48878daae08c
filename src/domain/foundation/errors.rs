//! Error types for the domain layer.

use thiserror::Error;

/// Errors raised by local input validation, before any network call.
///
/// Messages are user-facing and deterministic so presentation code can show
/// them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{message}")]
    EmptyField { field: String, message: String },

    #[error("{message}")]
    InvalidFormat { field: String, message: String },

    #[error("Password must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("Passwords do not match")]
    Mismatch { field: String },
}

impl ValidationError {
    /// Creates an empty field validation error with a generic message.
    pub fn empty_field(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("Field '{}' cannot be empty", field);
        ValidationError::EmptyField { field, message }
    }

    /// Creates an empty field validation error with a custom message.
    pub fn empty_field_with(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a minimum-length validation error.
    pub fn too_short(field: impl Into<String>, min: usize) -> Self {
        ValidationError::TooShort {
            field: field.into(),
            min,
        }
    }

    /// Creates a confirmation mismatch error.
    pub fn mismatch(field: impl Into<String>) -> Self {
        ValidationError::Mismatch { field: field.into() }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::TooShort { field, .. }
            | ValidationError::Mismatch { field } => field,
        }
    }
}
