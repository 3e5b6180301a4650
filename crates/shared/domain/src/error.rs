//! Domain-level errors.
//!
//! These errors describe records that violate domain rules. They are
//! independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transformation tag outside the known set
    #[error("Unknown transformation type: {0}")]
    UnknownTransformation(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
