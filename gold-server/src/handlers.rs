//! HTTP request handlers.

use crate::service::{FetchOutcome, GoldPriceService};
use crate::types::GoldResponse;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GoldPriceService>,
}

/// GET /api/gold - Current gold prices.
///
/// Always answers 200 with usable prices; failures surface only as
/// `source: "fallback"`.
pub async fn get_gold(State(state): State<AppState>) -> Json<GoldResponse> {
    debug!("gold price request received");

    let outcome = state.service.resolve().await;
    match &outcome {
        FetchOutcome::Fresh(p) => info!(source = p.source.as_str(), "serving fresh prices"),
        FetchOutcome::Stale(p, cached_at) => {
            debug!(source = p.source.as_str(), %cached_at, "serving cached prices")
        }
        FetchOutcome::Fallback(reason) => debug!(%reason, "serving fallback prices"),
    }

    let now = Utc::now();
    match GoldResponse::from_prices(&outcome.prices(), now) {
        Ok(resp) => Json(resp),
        Err(e) => {
            error!("failed to build gold response: {e:#}");
            Json(GoldResponse::fallback(now))
        }
    }
}

/// Turns a handler panic into the regular fallback payload.
pub fn panic_fallback(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("handler panicked: {detail}");

    (StatusCode::OK, Json(GoldResponse::fallback(Utc::now()))).into_response()
}
