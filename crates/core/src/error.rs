//! Domain error model.

use thiserror::Error;

use crate::PostId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is recoverable: the caller reports it inline and lets the
/// user retry. Authentication failures live in `campusboard-auth`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. empty title after trimming).
    #[error("validation failed: {0}")]
    Validation(String),

    /// No post with the given id exists in the content store.
    #[error("post {0} not found")]
    PostNotFound(PostId),

    /// No account with the given username exists in the directory.
    #[error("account '{0}' not found")]
    AccountNotFound(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A conflict occurred (e.g. duplicate username, reused id).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn account_not_found(username: impl Into<String>) -> Self {
        Self::AccountNotFound(username.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PostNotFound(_) | Self::AccountNotFound(_))
    }
}
