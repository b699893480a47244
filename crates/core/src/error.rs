//! Domain error model.

use thiserror::Error;

use crate::form::FieldErrors;

/// Domain-level error.
///
/// Deterministic input failures only. Missing rows and uniqueness clashes
/// are reported by the stores.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A submitted form failed validation, per field.
    #[error("form rejected: {0:?}")]
    Form(FieldErrors),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(value: validator::ValidationErrors) -> Self {
        Self::Form(crate::form::field_errors(&value))
    }
}
