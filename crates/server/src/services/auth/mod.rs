//! Account service.
//!
//! Validates registration and login payloads and delegates credential
//! storage to the user store. Passwords are hashed with Argon2id; the
//! plain text never leaves this module.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use sqlx::PgPool;

use tienda_core::{Email, UserId, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Candidate registration record.
///
/// `password2` is the confirmation field; it is validated against
/// `password` and then discarded. Every field defaults to empty so a
/// missing key surfaces as a field-level validation error instead of a
/// deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RegistrationInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Account service.
///
/// Handles user registration, login, and profile lookups.
pub struct AccountService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// Validation order: password confirmation, password length, username
    /// and email structure, then uniqueness against the store. Nothing is
    /// written until every check has passed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordMismatch` when the confirmation differs.
    /// Returns `AuthError::WeakPassword` when the password is too short.
    /// Returns `AuthError::EmailTaken`/`AuthError::UsernameTaken` on
    /// conflicts with existing accounts.
    pub async fn register(&self, input: &RegistrationInput) -> Result<User, AuthError> {
        validate_passwords(&input.password, &input.password2)?;

        let username = Username::parse(&input.username)?;
        let email = Email::parse(&input.email)?;

        // Exact-match lookup; the store compares emails case-sensitively.
        if self.users.email_exists(&email).await? {
            return Err(AuthError::EmailTaken);
        }
        if self.users.username_exists(&username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = hash_password(&input.password)?;

        let user = self
            .users
            .create(
                &username,
                &email,
                &password_hash,
                input.first_name.as_deref().unwrap_or(""),
                input.last_name.as_deref().unwrap_or(""),
            )
            .await
            .map_err(|e| match e {
                // Concurrent registration can still lose the race
                RepositoryError::Conflict(field) if field == "email" => AuthError::EmailTaken,
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` when either field is empty;
    /// authentication is not attempted in that case.
    /// Returns `AuthError::InvalidCredentials` for an unknown user or a
    /// wrong password.
    /// Returns `AuthError::Inactive` when the credentials match but the
    /// account is deactivated.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        // A structurally invalid username can never match an account
        let username =
            Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        // Correct credentials on a deactivated account get their own error
        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        Ok(user)
    }

    /// Whether a username is still free.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` for malformed input and
    /// `AuthError::Repository` if the lookup fails.
    pub async fn username_available(&self, username: &str) -> Result<bool, AuthError> {
        let username = Username::parse(username)?;
        Ok(!self.users.username_exists(&username).await?)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn get_user(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.get_by_id(user_id).await?)
    }
}

/// Check password confirmation and minimum length.
///
/// Length is measured in characters, not bytes; multibyte passwords get
/// no discount.
fn validate_passwords(password: &str, password2: &str) -> Result<(), AuthError> {
    if password != password2 {
        return Err(AuthError::PasswordMismatch);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_passwords_mismatch() {
        let result = validate_passwords("correct-horse", "correct-h0rse");
        assert!(matches!(result, Err(AuthError::PasswordMismatch)));
    }

    #[test]
    fn test_validate_passwords_too_short() {
        let result = validate_passwords("seven77", "seven77");
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[test]
    fn test_validate_passwords_minimum_length_accepted() {
        assert!(validate_passwords("eight888", "eight888").is_ok());
    }

    #[test]
    fn test_validate_passwords_counts_characters_not_bytes() {
        // Four characters, eight bytes in UTF-8
        let result = validate_passwords("ññññ", "ññññ");
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));

        // Eight characters, sixteen bytes
        assert!(validate_passwords("ññññññññ", "ññññññññ").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct-horse-battery").unwrap();
        assert_ne!(hash, "correct-horse-battery");
        assert!(verify_password("correct-horse-battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("correct-horse-battery").unwrap();
        let b = hash_password("correct-horse-battery").unwrap();
        assert_ne!(a, b);
    }
}
