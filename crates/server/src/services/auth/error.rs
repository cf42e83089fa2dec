//! Account service error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] tienda_core::UsernameError),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] tienda_core::EmailError),

    /// The two password fields do not match.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// An account with this email already exists.
    #[error("email already registered")]
    EmailTaken,

    /// An account with this username already exists.
    #[error("username already registered")]
    UsernameTaken,

    /// Username or password missing from a login attempt.
    #[error("username and password are required")]
    MissingCredentials,

    /// Invalid credentials (unknown user or wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Credentials matched but the account is deactivated.
    #[error("account is deactivated")]
    Inactive,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
