//! Response body of `GET /api/gold`.

use crate::price::{round2, PriceSet, PriceSource, FALLBACK};
use anyhow::{ensure, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Rounded prices, keyed by the upstream's Turkish denomination names.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GoldData {
    pub gram: f64,
    pub ceyrek: f64,
    pub yarim: f64,
    pub tam: f64,
    pub ons: f64,
}

#[derive(Serialize, Debug, Clone)]
pub struct GoldResponse {
    pub success: bool,
    pub source: PriceSource,
    pub data: GoldData,
    /// ISO-8601 time the response was generated, not when prices were fetched.
    pub timestamp: String,
}

impl GoldResponse {
    pub fn from_prices(prices: &PriceSet, now: DateTime<Utc>) -> Result<Self> {
        for value in prices.values() {
            ensure!(
                value.is_finite(),
                "non-finite price {value} from {}",
                prices.source.as_str()
            );
        }

        Ok(Self {
            success: true,
            source: prices.source,
            data: GoldData {
                gram: round2(prices.gram),
                ceyrek: round2(prices.quarter_coin),
                yarim: round2(prices.half_coin),
                tam: round2(prices.full_coin),
                ons: round2(prices.ounce),
            },
            timestamp: iso_timestamp(now),
        })
    }

    /// The fallback snapshot, stamped at `now`.
    pub fn fallback(now: DateTime<Utc>) -> Self {
        Self {
            success: true,
            source: PriceSource::Fallback,
            data: GoldData {
                gram: FALLBACK.gram,
                ceyrek: FALLBACK.quarter_coin,
                yarim: FALLBACK.half_coin,
                tam: FALLBACK.full_coin,
                ons: FALLBACK.ounce,
            },
            timestamp: iso_timestamp(now),
        }
    }
}

/// `2024-01-01T12:00:00.000Z`
fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
