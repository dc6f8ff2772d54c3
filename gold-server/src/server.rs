use crate::config::Config;
use crate::handlers::{get_gold, panic_fallback, AppState};
use crate::price_feed::DovizProvider;
use crate::service::GoldPriceService;
use anyhow::Context;
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the router around an already constructed service.
pub fn app(service: Arc<GoldPriceService>) -> Router {
    // Public read-only API: any origin may call it.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/api/gold", get(get_gold))
        .with_state(AppState { service })
        .layer(CatchPanicLayer::custom(panic_fallback))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind `config.bind_addr` and serve until the process is stopped.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let provider = DovizProvider::new(config.upstream_url.clone())
        .context("failed to build upstream HTTP client")?;
    let service = Arc::new(GoldPriceService::new(Box::new(provider)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("Server running on port {}", config.bind_addr.port());
    info!("  Upstream: {}", config.upstream_url);

    axum::serve(listener, app(service)).await?;
    Ok(())
}
