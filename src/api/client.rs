//! API client for communicating with the ESG reporting REST API.
//!
//! This module provides the `ApiClient` struct for listing, creating and
//! deleting records in the three collections.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{BusinessUnit, Company, EntityId, Metric};

use super::{ApiError, Resource};

// ============================================================================
// Constants
// ============================================================================

/// Base URL of a locally running reporting service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A list endpoint answers either with a bare array or with a page object
/// carrying a `results` array. A page object without `results` is empty.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CollectionResponse<T> {
    List(Vec<T>),
    Paged {
        #[serde(default = "Vec::new")]
        results: Vec<T>,
    },
}

impl<T> CollectionResponse<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            CollectionResponse::List(items) => items,
            CollectionResponse::Paged { results } => results,
        }
    }
}

/// A full collection as returned by the API, tagged by resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    Companies(Vec<Company>),
    BusinessUnits(Vec<BusinessUnit>),
    Metrics(Vec<Metric>),
}

impl Records {
    pub fn resource(&self) -> Resource {
        match self {
            Records::Companies(_) => Resource::Companies,
            Records::BusinessUnits(_) => Resource::BusinessUnits,
            Records::Metrics(_) => Resource::Metrics,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Records::Companies(items) => items.len(),
            Records::BusinessUnits(items) => items.len(),
            Records::Metrics(items) => items.len(),
        }
    }
}

/// API client for the reporting service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<Arc<String>>,
}

impl ApiClient {
    /// Create a new API client for the given base URL (e.g. `http://host/api`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given bearer token, sharing the connection pool.
    pub fn with_token(&self, token: impl Into<Arc<String>>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}/", self.base_url, resource.path())
    }

    fn record_url(&self, resource: Resource, id: EntityId) -> String {
        format!("{}/{}/{}/", self.base_url, resource.path(), id)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    // ===== Collection Operations =====

    /// Fetch a whole collection.
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>> {
        let url = self.collection_url(resource);
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        let parsed: CollectionResponse<T> = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .with_context(|| format!("Failed to parse {} response", resource.path()))?;

        let items = parsed.into_items();
        debug!(resource = resource.path(), count = items.len(), "Collection fetched");
        Ok(items)
    }

    /// Fetch a whole collection into its typed `Records` variant.
    pub async fn fetch_records(&self, resource: Resource) -> Result<Records> {
        Ok(match resource {
            Resource::Companies => Records::Companies(self.list(resource).await?),
            Resource::BusinessUnits => Records::BusinessUnits(self.list(resource).await?),
            Resource::Metrics => Records::Metrics(self.list(resource).await?),
        })
    }

    /// Create a record. Returns the created entity as sent back by the server
    /// (`Value::Null` when the server answers without a body).
    pub async fn create<B: Serialize>(&self, resource: Resource, body: &B) -> Result<serde_json::Value> {
        let url = self.collection_url(resource);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        let text = response.text().await.unwrap_or_default();
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// Delete a single record.
    pub async fn delete(&self, resource: Resource, id: EntityId) -> Result<()> {
        let url = self.record_url(resource, id);
        let response = self
            .client
            .delete(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        Self::check_response(response).await?;
        debug!(resource = resource.path(), id, "Record deleted");
        Ok(())
    }
}
