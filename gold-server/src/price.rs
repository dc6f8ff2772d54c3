//! Gold price snapshot types.

use serde::{Serialize, Serializer};

/// Exclusive lower bound of the plausible gram price.
pub const GRAM_FLOOR: f64 = 5000.0;
/// Exclusive upper bound of the plausible gram price.
pub const GRAM_CEILING: f64 = 7000.0;

/// Snapshot served when live data is unavailable or implausible.
pub const FALLBACK: PriceSet = PriceSet {
    gram: 5547.49,
    quarter_coin: 8876.0,
    half_coin: 17752.0,
    full_coin: 35504.0,
    ounce: 172552.0,
    source: PriceSource::Fallback,
};

/// Where a [`PriceSet`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// Live data from the named upstream provider.
    Upstream(&'static str),
    Fallback,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::Upstream(name) => name,
            PriceSource::Fallback => "fallback",
        }
    }
}

impl Serialize for PriceSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Gold prices for the five served denominations, all in TRY.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSet {
    pub gram: f64,
    /// Çeyrek altın.
    pub quarter_coin: f64,
    /// Yarım altın.
    pub half_coin: f64,
    /// Tam altın.
    pub full_coin: f64,
    /// Troy ounce.
    pub ounce: f64,
    pub source: PriceSource,
}

impl PriceSet {
    pub fn values(&self) -> [f64; 5] {
        [
            self.gram,
            self.quarter_coin,
            self.half_coin,
            self.full_coin,
            self.ounce,
        ]
    }
}

/// True when `gram` lies strictly inside the plausibility band.
pub fn is_plausible_gram(gram: f64) -> bool {
    gram > GRAM_FLOOR && gram < GRAM_CEILING
}

/// Round to two decimal places on the exact decimal value of `value`, so
/// `5600.075` (stored as `5600.07499...`) becomes `5600.07`. Exact halves
/// such as `0.125` round away from zero.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    // An exact half needs a multiple of 1/8; then `scaled` is exact too.
    if (value * 8.0).fract() == 0.0 && scaled.fract().abs() == 0.5 {
        return scaled.round() / 100.0;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}
