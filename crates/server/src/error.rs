//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side failures
//! to Sentry before responding. Account handlers return
//! `Result<Response, AppError>`; validation failures serialize as
//! field-level error maps, everything internal collapses to a generic
//! envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Generic message for failures the client should not see details of.
const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor.";

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Account operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_)
                | Self::Session(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::Auth(err) => auth_error_response(&err),
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "error": INTERNAL_ERROR_MESSAGE})),
            )
                .into_response(),
            Self::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"success": false, "error": message})),
            )
                .into_response(),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "error": message})),
            )
                .into_response(),
        }
    }
}

/// Map an `AuthError` to a field-level validation envelope.
///
/// The key is the offending field (or the failure code for login errors)
/// and the message is the Spanish wording clients already parse.
fn auth_error_response(err: &AuthError) -> Response {
    let (status, key, message) = match err {
        AuthError::InvalidUsername(e) => (StatusCode::BAD_REQUEST, "username", e.to_string()),
        AuthError::InvalidEmail(e) => (StatusCode::BAD_REQUEST, "email", e.to_string()),
        AuthError::PasswordMismatch => (
            StatusCode::BAD_REQUEST,
            "password",
            "Las contraseñas no coinciden".to_string(),
        ),
        AuthError::WeakPassword(_) => (
            StatusCode::BAD_REQUEST,
            "password",
            "La contraseña debe tener al menos 8 caracteres".to_string(),
        ),
        AuthError::EmailTaken => (
            StatusCode::BAD_REQUEST,
            "email",
            "Ya existe un usuario con este correo electrónico".to_string(),
        ),
        AuthError::UsernameTaken => (
            StatusCode::BAD_REQUEST,
            "username",
            "Ya existe un usuario con este nombre de usuario".to_string(),
        ),
        AuthError::MissingCredentials => (
            StatusCode::BAD_REQUEST,
            "required",
            "Debe incluir usuario y contraseña.".to_string(),
        ),
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "authentication",
            "Credenciales incorrectas. Por favor, verifica tu usuario y contraseña.".to_string(),
        ),
        AuthError::Inactive => (
            StatusCode::UNAUTHORIZED,
            "inactive",
            "Esta cuenta está desactivada.".to_string(),
        ),
        AuthError::Repository(_) | AuthError::PasswordHash => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "error": INTERNAL_ERROR_MESSAGE})),
            )
                .into_response();
        }
    };

    (
        status,
        Json(json!({"success": false, "errors": { key: message }})),
    )
        .into_response()
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Unauthorized("no session".to_string());
        assert_eq!(err.to_string(), "Unauthorized: no session");
    }

    #[test]
    fn test_validation_errors_are_bad_request() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::PasswordMismatch)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::WeakPassword("short".into()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::EmailTaken)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::MissingCredentials)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_login_failures_are_unauthorized() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::Inactive)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_internal_failures_are_500() {
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::PasswordHash)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
