//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (database ping)
//!
//! # Accounts
//! POST /accounts/api/register/        - Register a new user
//! POST /accounts/api/login/           - Login, establishes a session
//! POST /accounts/api/logout/          - Logout, destroys the session
//! GET  /accounts/api/profile/         - Current user's profile
//! GET  /accounts/api/check-username/  - Username availability
//!
//! # Product gateway (proxied to the remote catalog)
//! GET    /products/api/products       - List products
//! POST   /products/api/products       - Create a product
//! GET    /products/api/products/{id}  - Product detail
//! PUT    /products/api/products/{id}  - Update a product
//! DELETE /products/api/products/{id}  - Delete a product
//! ```
//!
//! Each path registers only its allowed methods; axum answers 405 for the
//! rest. There is no CSRF layer on the product endpoints.

pub mod accounts;
pub mod products;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Create the account API router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/register/", post(accounts::register))
        .route("/login/", post(accounts::login))
        .route("/logout/", post(accounts::logout))
        .route("/profile/", get(accounts::profile))
        .route("/check-username/", get(accounts::check_username))
}

/// Create the product gateway router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::detail)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the combined application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/accounts/api", account_routes())
        .nest("/products/api", product_routes())
}
