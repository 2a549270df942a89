//! Track catalog gateway.
//!
//! Search is delegated to an external music catalog over HTTP. Results are
//! opaque, immutable tracks; the engine never holds a party lock across a
//! catalog call.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::CatalogConfig;
use crate::models::Track;

const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Catalog failure surfaced to callers as `UpstreamUnavailable`.
#[derive(Debug)]
pub struct CatalogError {
    reason: String,
}

impl CatalogError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Search interface against the external music catalog.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Track>, CatalogError>;
}

/// HTTP catalog client hitting `{base_url}/search?q=...`.
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct SearchPayload {
    tracks: Vec<Track>,
}

impl HttpCatalog {
    pub fn new(cfg: &CatalogConfig) -> Result<Self> {
        let timeout = Duration::from_millis(cfg.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build catalog http client")?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl CatalogGateway for HttpCatalog {
    async fn search(&self, query: &str) -> Result<Vec<Track>, CatalogError> {
        let url = format!(
            "{}/search?q={}",
            self.base_url,
            urlencoding::encode(query)
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| CatalogError::new(err.to_string()))?;
        if !response.status().is_success() {
            return Err(CatalogError::new(format!(
                "catalog returned {}",
                response.status()
            )));
        }
        let payload: SearchPayload = response
            .json()
            .await
            .map_err(|err| CatalogError::new(err.to_string()))?;
        Ok(payload.tracks)
    }
}
