//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures (validation, malformed ids,
/// duplicate keys in a snapshot). Collaborator failures belong in the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. an empty warehouse set).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. blank string).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A key appeared more than once where it must be unique.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn duplicate_key(msg: impl Into<String>) -> Self {
        Self::DuplicateKey(msg.into())
    }
}
