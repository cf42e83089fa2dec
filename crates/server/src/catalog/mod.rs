//! Remote product API client.
//!
//! The gateway half of the service: translates local CRUD requests into
//! calls against the remote catalog and hands structured results back to
//! the route layer. The base URL and the timeout both come from
//! [`CatalogConfig`]; every outbound call carries the same timeout.

pub mod conversions;
pub mod types;

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use tienda_core::ProductId;

use crate::config::CatalogConfig;
use types::{RemotePayload, RemoteProduct};

/// Errors that can occur when talking to the remote product API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure: timeout, connection refused, body read error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote answered but the body was not the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The remote reported the product does not exist.
    #[error("product not found")]
    NotFound,

    /// Any other non-success remote status, with the response body.
    #[error("upstream status {status}: {body}")]
    Upstream { status: u16, body: String },
}

/// Client for the remote product API.
///
/// Cheaply cloneable; holds one `reqwest::Client` with the configured
/// timeout baked in.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &CatalogConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/products", self.inner.base_url)
    }

    fn item_url(&self, id: ProductId) -> String {
        format!("{}/products/{id}", self.inner.base_url)
    }

    /// Fetch every product from the remote listing endpoint.
    ///
    /// # Errors
    ///
    /// `Upstream` on any non-200 remote status, `Http`/`Parse` on
    /// transport or decode failure.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<RemoteProduct>, CatalogError> {
        let response = self.inner.client.get(self.collection_url()).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            return Err(upstream(status, text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// `NotFound` when the remote answers 404, `Upstream` for other
    /// non-200 statuses.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<RemoteProduct, CatalogError> {
        let response = self.inner.client.get(self.item_url(id)).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }

        let text = response.text().await?;

        if status != StatusCode::OK {
            return Err(upstream(status, text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Create a product on the remote collection endpoint.
    ///
    /// On 201 returns the remote response body verbatim; the remote
    /// object (with its server-assigned id) is the canonical created
    /// state.
    ///
    /// # Errors
    ///
    /// `Upstream` on any status other than 201.
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &RemotePayload) -> Result<Value, CatalogError> {
        let response = self
            .inner
            .client
            .post(self.collection_url())
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::CREATED {
            return Err(upstream(status, text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Update a product in place.
    ///
    /// # Errors
    ///
    /// `Upstream` on any status other than 200.
    #[instrument(skip(self, payload), fields(product_id = %id))]
    pub async fn update(
        &self,
        id: ProductId,
        payload: &RemotePayload,
    ) -> Result<Value, CatalogError> {
        let response = self
            .inner
            .client
            .put(self.item_url(id))
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            return Err(upstream(status, text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Delete a product.
    ///
    /// The remote confirms deletion with a literal `true` body. Anything
    /// else - including a 200 carrying `false` - is a failure, with the
    /// remote's `message` field extracted when the body is JSON.
    ///
    /// # Errors
    ///
    /// `Upstream` on any non-confirming response.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let response = self.inner.client.delete(self.item_url(id)).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::OK && is_literal_true(&text) {
            return Ok(());
        }

        Err(CatalogError::Upstream {
            status: status.as_u16(),
            body: extract_message(&text),
        })
    }
}

fn upstream(status: StatusCode, body: String) -> CatalogError {
    CatalogError::Upstream {
        status: status.as_u16(),
        body,
    }
}

/// Whether a response body is the JSON boolean `true`.
fn is_literal_true(body: &str) -> bool {
    matches!(serde_json::from_str::<Value>(body), Ok(Value::Bool(true)))
}

/// Pull the `message` field out of a JSON error body, falling back to the
/// raw text.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(ToOwned::to_owned))
        .unwrap_or_else(|| body.to_string())
}

/// Truncate an upstream body for inclusion in an error message.
#[must_use]
pub fn truncate_detail(body: &str) -> String {
    body.chars().take(200).collect()
}
