//! doviz.com gold price provider.

use super::{extract_prices, FetchError, PriceProvider};
use crate::price::PriceSet;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Url};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

pub const DOVIZ_GOLDS_URL: &str = "https://www.doviz.com/api/v1/golds";
pub const DOVIZ_SOURCE: &str = "doviz.com";
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

// doviz.com rejects requests without a browser user agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Fetches gold prices from the doviz.com `golds` endpoint.
#[derive(Debug, Clone)]
pub struct DovizProvider {
    client: Client,
    url: Url,
}

impl DovizProvider {
    pub fn new(url: Url) -> reqwest::Result<Self> {
        Self::with_timeout(url, UPSTREAM_TIMEOUT)
    }

    pub fn with_timeout(url: Url, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl PriceProvider for DovizProvider {
    fn name(&self) -> &'static str {
        DOVIZ_SOURCE
    }

    async fn try_fetch(&self) -> Result<PriceSet, FetchError> {
        info!("requesting gold prices from {}", self.url);

        let resp = self
            .client
            .get(self.url.clone())
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let bytes = resp.bytes().await?;
        debug!("doviz.com response: {} bytes", bytes.len());

        // Parse like: { "gram-altin": {"selling": "5600,50", "buying": ...}, ... }
        let body: Map<String, Value> = serde_json::from_slice(&bytes)
            .map_err(|e| FetchError::Malformed(format!("expected a JSON object: {e}")))?;

        extract_prices(&body, DOVIZ_SOURCE)
    }
}
