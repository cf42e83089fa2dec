//! Account route handlers.
//!
//! Registration, login, logout, profile and username checks. Validation
//! and credential handling live in [`AccountService`]; these handlers do
//! the session bookkeeping and JSON shaping.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::models::session::{CurrentUser, keys};
use crate::services::auth::{AccountService, RegistrationInput};
use crate::state::AppState;

/// Login form data.
///
/// Fields default to empty so a missing key surfaces as a `required`
/// validation error instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Query parameters for the username availability check.
#[derive(Debug, Deserialize)]
pub struct CheckUsernameQuery {
    #[serde(default)]
    pub username: String,
}

/// Handle registration.
///
/// On success returns 201 with the created user's public projection; the
/// password is hashed inside the service and never echoed back.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegistrationInput>,
) -> Result<Response> {
    let service = AccountService::new(state.pool());
    let user = service.register(&input).await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({"success": true, "user": user})),
    )
        .into_response())
}

/// Handle login.
///
/// On success stores the user's identity in the session. The session id
/// is cycled to avoid fixation.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<LoginInput>,
) -> Result<Response> {
    let service = AccountService::new(state.pool());
    let user = service.login(&input.username, &input.password).await?;

    session.cycle_id().await?;
    session
        .insert(
            keys::CURRENT_USER,
            &CurrentUser {
                id: user.id,
                username: user.username.clone(),
            },
        )
        .await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(json!({"success": true, "user": user})).into_response())
}

/// Handle logout: destroy the whole session.
pub async fn logout(session: Session) -> Result<Response> {
    session.flush().await?;
    Ok(Json(json!({"success": true})).into_response())
}

/// Return the logged-in user's profile.
///
/// The profile is re-read from the store so deactivation or deletion
/// since login is reflected immediately.
pub async fn profile(State(state): State<AppState>, session: Session) -> Result<Response> {
    let current: Option<CurrentUser> = session.get(keys::CURRENT_USER).await?;
    let Some(current) = current else {
        return Err(AppError::Unauthorized("No autenticado.".to_string()));
    };

    let service = AccountService::new(state.pool());
    let user = service
        .get_user(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("No autenticado.".to_string()))?;

    Ok(Json(json!({"success": true, "user": user})).into_response())
}

/// Report whether a username is still free.
pub async fn check_username(
    State(state): State<AppState>,
    Query(query): Query<CheckUsernameQuery>,
) -> Result<Response> {
    let service = AccountService::new(state.pool());
    let available = service.username_available(&query.username).await?;

    Ok(Json(json!({"success": true, "available": available})).into_response())
}
