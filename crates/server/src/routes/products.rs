//! Product gateway route handlers.
//!
//! Single-shot request/response mappings: each handler forwards to the
//! remote catalog, reshapes the result into the local envelope and maps
//! the remote status. No retries, no cross-request state.
//!
//! Status policy: success is always local 200; upstream failures pass the
//! upstream status through (uniformly, list included); transport failures
//! are local 500. Client-facing messages are in Spanish.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use tienda_core::ProductId;

use crate::catalog::{CatalogError, conversions, truncate_detail, types::parse_new_product};
use crate::state::AppState;

/// Message for a detail fetch that found nothing.
const NOT_FOUND_MESSAGE: &str = "Producto no encontrado.";

/// List every product from the remote catalog.
///
/// Each product is individually wrapped in a success envelope, and the
/// whole collection wrapped again - the shape local clients rely on.
pub async fn list(State(state): State<AppState>) -> Response {
    match state.catalog().list().await {
        Ok(products) => {
            let entries: Vec<Value> = products
                .into_iter()
                .map(|p| json!({"success": true, "product": conversions::list_view(p)}))
                .collect();
            Json(json!({"success": true, "products": entries})).into_response()
        }
        Err(CatalogError::Upstream { status, body }) => failure(
            upstream_status(status),
            format!(
                "Error en la API: {status}. Detalles: {}",
                truncate_detail(&body)
            ),
        ),
        Err(CatalogError::Http(e)) => {
            failure(StatusCode::INTERNAL_SERVER_ERROR, transport_message(&e))
        }
        Err(err) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error en la solicitud: {err}"),
        ),
    }
}

/// Fetch a single product, category included.
pub async fn detail(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.catalog().get(ProductId::new(id)).await {
        Ok(product) => {
            Json(json!({"success": true, "product": conversions::detail_view(product)}))
                .into_response()
        }
        Err(CatalogError::NotFound) => {
            failure(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string())
        }
        Err(CatalogError::Upstream { status, body }) => failure(
            upstream_status(status),
            format!(
                "Error en la API: {status}. Detalles: {}",
                truncate_detail(&body)
            ),
        ),
        Err(err) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error en la solicitud: {err}"),
        ),
    }
}

/// Create a product on the remote catalog.
///
/// The body is parsed leniently (numeric strings coerce); the success
/// response echoes the remote-created object, whose server-assigned id is
/// the canonical state.
pub async fn create(State(state): State<AppState>, body: String) -> Response {
    let product = match parse_new_product(&body) {
        Ok(p) => p,
        Err(msg) => {
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error en la solicitud: {msg}"),
            );
        }
    };

    match state.catalog().create(&product.into_payload()).await {
        Ok(created) => Json(json!({"success": true, "product": created})).into_response(),
        Err(CatalogError::Upstream { status, body }) => failure(
            upstream_status(status),
            format!("Error al crear el producto: {status}. Detalles: {body}"),
        ),
        Err(err) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error en la solicitud: {err}"),
        ),
    }
}

/// Update a product in place on the remote catalog.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: String,
) -> Response {
    let product = match parse_new_product(&body) {
        Ok(p) => p,
        Err(msg) => {
            return failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error en la solicitud: {msg}"),
            );
        }
    };

    match state
        .catalog()
        .update(ProductId::new(id), &product.into_payload())
        .await
    {
        Ok(updated) => Json(json!({"success": true, "product": updated})).into_response(),
        Err(CatalogError::Upstream { status, body }) => failure(
            upstream_status(status),
            format!("Error al actualizar el producto: {status}. Detalles: {body}"),
        ),
        Err(err) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error en la solicitud: {err}"),
        ),
    }
}

/// Delete a product from the remote catalog.
///
/// The remote confirms with a literal `true` body; anything else is a
/// failure even under a 200.
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.catalog().delete(ProductId::new(id)).await {
        Ok(()) => {
            Json(json!({"success": true, "message": "Producto eliminado con éxito."}))
                .into_response()
        }
        Err(CatalogError::Upstream { status, body }) => failure(
            upstream_status(status),
            format!("Error de la API al eliminar: {status}. Detalles: {body}"),
        ),
        Err(err) => failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error de red: {err}"),
        ),
    }
}

/// Build a `{success: false, error}` envelope response.
fn failure(status: StatusCode, error: String) -> Response {
    (status, Json(json!({"success": false, "error": error}))).into_response()
}

/// Map an upstream status code onto the local response.
fn upstream_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Human-readable message for a transport failure.
fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "La solicitud ha tardado demasiado tiempo en responder.".to_string()
    } else if err.is_connect() {
        "Error de conexión. Por favor, verifica tu conexión a Internet.".to_string()
    } else {
        format!("Error en la solicitud: {err}")
    }
}
