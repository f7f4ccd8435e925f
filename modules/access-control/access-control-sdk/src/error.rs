//! Error types for the access control module.

use thiserror::Error;

/// Errors that can be returned by the [`crate::AccessControlClientV1`].
#[derive(Debug, Error, Clone)]
pub enum AccessControlError {
    /// The addressed resource does not exist (or is soft-deleted).
    #[error("{message}")]
    NotFound { message: String },

    /// The request payload violates a catalog or grant rule.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// An internal error occurred.
    #[error("internal error")]
    Internal,
}

impl AccessControlError {
    /// Create a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an Internal error.
    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
