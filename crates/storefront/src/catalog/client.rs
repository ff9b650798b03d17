//! Product catalog API client.
//!
//! One read-only `GET` against the configured endpoint, which must return a
//! JSON array of product records. There is no pagination, auth or retry; a
//! failed fetch is reported to the caller, which decides whether to offer a
//! manual retry.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tienda_core::{Price, ProductId};
use tracing::instrument;
use url::Url;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Catalog API returned status {status}")]
    Status { status: u16 },

    /// The response body was not a list of products.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A product as returned by the catalog API.
///
/// Fields the storefront does not use (description, rating, the API's own
/// category) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
}

/// Client for the product catalog endpoint.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl CatalogClient {
    /// Create a client for `endpoint` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tienda-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// The configured endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch every product from the endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the status is not 2xx, or the body
    /// is not a JSON array of product records.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn fetch_products(&self) -> Result<Vec<ProductRecord>, CatalogError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Catalog API returned an error status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let records = parse_products(&body)?;
        tracing::debug!(products = records.len(), "Catalog fetched");
        Ok(records)
    }
}

/// Parse a catalog response body.
///
/// # Errors
///
/// Returns error if the body is not a JSON array of product records.
pub fn parse_products(body: &[u8]) -> Result<Vec<ProductRecord>, CatalogError> {
    Ok(serde_json::from_slice(body)?)
}
