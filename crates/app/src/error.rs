use thiserror::Error;

use campusboard_auth::{AuthError, AuthzError};
use campusboard_core::DomainError;

/// Any failure of a board operation. All of them are recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl BoardError {
    /// Inline message shown next to the failed action.
    pub fn user_message(&self) -> String {
        match self {
            BoardError::Auth(AuthError::InvalidCredentials) => {
                "Invalid username, password, or role".to_string()
            }
            BoardError::Auth(AuthError::AccountDisabled) => {
                "This account has been disabled. Please contact an administrator.".to_string()
            }
            BoardError::Auth(AuthError::AlreadyAuthenticated) => {
                "You are already signed in. Please sign out first.".to_string()
            }
            BoardError::Authz(AuthzError::NotAuthenticated) => "Please sign in first.".to_string(),
            BoardError::Authz(AuthzError::Forbidden { .. }) => {
                "You do not have permission to do that.".to_string()
            }
            BoardError::Authz(AuthzError::ProtectedAccount(name)) => {
                format!("The account '{name}' cannot be disabled.")
            }
            BoardError::Domain(DomainError::Validation(msg)) => capitalize(msg),
            BoardError::Domain(DomainError::PostNotFound(id)) => {
                format!("Post {id} no longer exists.")
            }
            BoardError::Domain(DomainError::AccountNotFound(name)) => {
                format!("No account named '{name}'.")
            }
            BoardError::Domain(other) => other.to_string(),
        }
    }
}

fn capitalize(msg: &str) -> String {
    let mut chars = msg.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
