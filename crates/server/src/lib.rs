//! Tienda server library.
//!
//! Provides the service as a library so the router can be exercised
//! end-to-end by the integration test suite.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router for a given state.
///
/// Includes the health endpoints, the account API, the product gateway
/// and the session layer. The session store's schema migration is the
/// caller's responsibility (see `main`).
pub fn app(state: AppState) -> Router {
    let session_layer =
        middleware::create_session_layer(state.pool(), &state.config().session_secret);

    Router::new()
        .route("/health", get(routes::health))
        .route("/health/ready", get(routes::readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
