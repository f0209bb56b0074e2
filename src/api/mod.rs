//! HTTP API module for the labweb service
//!
//! Provides the fixed route table and the request-timing middleware.
//!
//! # Endpoints
//! - `GET /` — demo index, increments the hit counter when the store is up
//! - `GET /health` — health check with uptime and store reachability
//! - `GET /metrics` — Prometheus metrics

pub mod handlers;
mod state;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};

pub use state::AppState;

/// Maps a matched route path to its endpoint label
///
/// `None` means the request fell through to the 404 fallback.
#[must_use]
pub fn route_name(matched_path: Option<&str>) -> &'static str {
    match matched_path {
        Some("/") => "index",
        Some("/health") => "health",
        Some("/metrics") => "metrics",
        _ => "unknown",
    }
}

/// Request-timing middleware
///
/// Layered over the whole router, fallback included, so every request is
/// measured and recorded regardless of how the handler exits.
pub async fn track_metrics(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let endpoint = route_name(
        req.extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str),
    );
    let start = Instant::now();

    let response = next.run(req).await;

    state.metrics.record_request(
        method.as_str(),
        endpoint,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Creates the main Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    for endpoint in ["index", "health", "metrics"] {
        state.metrics.initialize_endpoint(endpoint);
    }

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), track_metrics))
        .with_state(state)
}
