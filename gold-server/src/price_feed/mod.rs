pub mod doviz;
pub mod quote;

pub use doviz::DovizProvider;
pub use quote::{parse_price_text, Quote, QuoteValue};

use crate::price::{is_plausible_gram, PriceSet, PriceSource};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Upstream keys for gram, quarter, half, full coin and ounce, in that order.
pub const DENOMINATION_KEYS: [&str; 5] = [
    "gram-altin",
    "ceyrek-altin",
    "yarim-altin",
    "tam-altin",
    "ons",
];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("non-success status: {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("implausible gram price: {gram}")]
    Implausible { gram: f64 },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport(e) if e.is_timeout())
    }
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Name the accepted prices are tagged with.
    fn name(&self) -> &'static str;

    /// One attempt at fetching plausible prices.
    async fn try_fetch(&self) -> Result<PriceSet, FetchError>;

    /// Like [`try_fetch`](Self::try_fetch) but never fails; errors are logged.
    async fn fetch(&self) -> Option<PriceSet> {
        match self.try_fetch().await {
            Ok(prices) => Some(prices),
            Err(e) => {
                warn!(provider = self.name(), "fetch failed: {e}");
                None
            }
        }
    }
}

/// Pulls the five denominations out of an upstream body and applies the
/// plausibility band to the gram price.
pub fn extract_prices(
    body: &Map<String, Value>,
    source: &'static str,
) -> Result<PriceSet, FetchError> {
    let [gram, quarter_coin, half_coin, full_coin, ounce] =
        DENOMINATION_KEYS.map(|key| extract_price(body, key));
    let prices = PriceSet {
        gram: gram?,
        quarter_coin: quarter_coin?,
        half_coin: half_coin?,
        full_coin: full_coin?,
        ounce: ounce?,
        source: PriceSource::Upstream(source),
    };

    if !is_plausible_gram(prices.gram) {
        return Err(FetchError::Implausible { gram: prices.gram });
    }
    Ok(prices)
}

/// A missing key, or an entry with neither price, reads as `0`.
fn extract_price(body: &Map<String, Value>, key: &str) -> Result<f64, FetchError> {
    let quote = match body.get(key) {
        Some(v @ Value::Object(_)) => Quote::deserialize(v).unwrap_or_default(),
        _ => Quote::default(),
    };
    let Some(value) = quote.preferred() else {
        return Ok(0.0);
    };
    let price = value
        .to_f64()
        .ok_or_else(|| FetchError::Malformed(format!("{key}: unreadable price {value:?}")))?;
    if !price.is_finite() || price < 0.0 {
        return Err(FetchError::Malformed(format!("{key}: invalid price {price}")));
    }
    Ok(price)
}
