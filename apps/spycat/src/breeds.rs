//! # Breed Catalog
//!
//! Resolves the list of recognized breeds, either from configuration or
//! from a TheCatAPI-compatible `GET /v1/breeds` endpoint.
//!
//! Resolution never fails: any transport, status or decode error is logged
//! and yields an empty list, so every breed check fails closed.

use crate::config::BreedsConfig;
use serde::Deserialize;
use spycat_core::BreedList;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors from the breed service client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be built.
    #[error("Cannot build HTTP client: {0}")]
    Build(String),
    /// Cannot reach the breed service (includes timeouts).
    #[error("Cannot connect to breed service at {0}")]
    ConnectionFailed(String),
    /// The service answered with a non-success status.
    #[error("Breed service returned status {0}")]
    Status(u16),
    /// Failed to parse response body.
    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Deserialize)]
struct BreedEntry {
    name: String,
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// HTTP client for the breed list endpoint.
#[derive(Debug, Clone)]
pub struct CatApiClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl CatApiClient {
    /// Create a client with a per-request timeout.
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
            api_key,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the breed list and collect the names.
    pub async fn fetch_breeds(&self) -> Result<BreedList, ClientError> {
        let mut req = self.http.get(&self.url);
        if let Some(ref key) = self.api_key {
            req = req.header("x-api-key", key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.url)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let entries = resp
            .json::<Vec<BreedEntry>>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))?;

        Ok(entries.into_iter().map(|b| b.name).collect())
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Where recognized breeds come from.
#[derive(Debug)]
pub enum BreedCatalog {
    /// A fixed list from configuration.
    Fixed(BreedList),
    /// The remote service, with successful fetches cached for `ttl`.
    Remote {
        client: CatApiClient,
        ttl: Duration,
        cache: Mutex<Option<(Instant, BreedList)>>,
    },
}

impl BreedCatalog {
    #[must_use]
    pub fn remote(client: CatApiClient, ttl: Duration) -> Self {
        Self::Remote {
            client,
            ttl,
            cache: Mutex::new(None),
        }
    }

    /// Build the catalog described by `[breeds]`.
    pub fn from_config(config: &BreedsConfig) -> Result<Self, ClientError> {
        if let Some(ref names) = config.allow {
            return Ok(Self::Fixed(names.iter().cloned().collect()));
        }
        let client = CatApiClient::new(&config.url, config.api_key.clone(), config.timeout())?;
        Ok(Self::remote(client, config.cache_ttl()))
    }

    /// Short description for startup output.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Fixed(list) => format!("fixed list ({} breeds)", list.len()),
            Self::Remote { client, .. } => format!("remote ({})", client.url()),
        }
    }

    /// Resolve the current list, surfacing remote failures.
    pub async fn try_resolve(&self) -> Result<BreedList, ClientError> {
        match self {
            Self::Fixed(list) => Ok(list.clone()),
            Self::Remote { client, ttl, cache } => {
                let mut cached = cache.lock().await;
                if let Some((fetched_at, list)) = cached.as_ref()
                    && fetched_at.elapsed() < *ttl
                {
                    return Ok(list.clone());
                }

                let list = client.fetch_breeds().await?;
                *cached = Some((Instant::now(), list.clone()));
                Ok(list)
            }
        }
    }

    /// Resolve the current list. Failures yield an empty list.
    pub async fn resolve(&self) -> BreedList {
        match self.try_resolve().await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(error = %e, "Breed lookup failed, rejecting breed");
                BreedList::empty()
            }
        }
    }
}
