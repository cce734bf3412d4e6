//! Stats API Client
//!
//! Fetches precomputed dashboard statistics for a period.

use reqwest::Client;
use std::time::Duration;

use super::models::{Period, StatsResponse};
use super::{build_http_client, ensure_success, no_store, ClientResult};
use crate::config::{ApiConfig, ExecutionContext};

/// Client for `GET /api/stats` and `GET /health`
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
}

impl StatsClient {
    /// Create a client for an explicit base address
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client whose address depends on where the caller runs
    pub fn from_config(config: &ApiConfig, context: ExecutionContext) -> ClientResult<Self> {
        Self::new(config.base_url(context), config.request_timeout())
    }

    /// Base address requests go to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch dashboard statistics for `period`
    pub async fn get_stats(&self, period: Period) -> ClientResult<StatsResponse> {
        let url = format!("{}/api/stats", self.base_url);
        tracing::debug!(%period, "Fetching stats from {}", url);

        let request = self.client.get(&url).query(&[("period", period.as_str())]);
        let response = no_store(request).send().await?;
        let response = ensure_success(response, "Failed to fetch stats")?;

        Ok(response.json().await?)
    }

    /// Check that the backend answers its health endpoint
    pub async fn health_check(&self) -> ClientResult<()> {
        let url = format!("{}/health", self.base_url);
        let response = no_store(self.client.get(&url)).send().await?;
        ensure_success(response, "Health check failed")?;
        Ok(())
    }
}
