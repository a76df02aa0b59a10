use thiserror::Error;

use crate::user::errors::UserError;

/// Failure of a credential-lifecycle operation.
///
/// Each variant corresponds to one response category at the HTTP boundary;
/// the domain never builds responses itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Missing or invalid credentials or session token (401)
    #[error("{0}")]
    Unauthenticated(String),

    /// No account for the given email (404)
    #[error("{0}")]
    NotFound(String),

    /// Reset token/code/email mismatch or unusable reset token (400)
    #[error("{0}")]
    InvalidReset(String),

    /// Reset token signature is valid but the token has expired (410)
    #[error("{0}")]
    Expired(String),

    /// Store, hashing or signing failure (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::NotFoundByEmail(_) => {
                AuthError::NotFound(err.to_string())
            }
            other => AuthError::Internal(other.to_string()),
        }
    }
}

impl From<auth::PasswordError> for AuthError {
    fn from(err: auth::PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
