//! Gold price API.
//!
//! Serves `GET /api/gold` with gram, quarter, half and full coin and ounce
//! prices in TRY. Prices come from doviz.com, are checked against a
//! plausibility band on the gram price and cached for five minutes. When the
//! upstream fails or looks wrong a fixed snapshot is served instead, so the
//! endpoint always answers 200.

pub mod cache;
pub mod config;
pub mod handlers;
pub mod price;
pub mod price_feed;
pub mod server;
pub mod service;
pub mod types;

pub use config::Config;
pub use price::{PriceSet, PriceSource, FALLBACK};
pub use server::{app, run_server};
pub use service::{FallbackReason, FetchOutcome, GoldPriceService};
