use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AppState;
use crate::redis::IncrOutcome;

/// Store key for the demo hit counter
pub const HIT_COUNTER_KEY: &str = "labweb_hits";

/// Index endpoint response structure
///
/// `hit_count` and `redis_error` stay null on the degraded path; a null
/// `hit_count` together with a populated `redis_error` means the store was
/// reachable but the increment failed.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub message: String,
    pub path: String,
    pub host: String,
    pub env: String,
    pub hit_count: Option<i64>,
    pub redis_error: Option<String>,
}

/// GET /
///
/// Increments the hit counter when the store is available. Dependency
/// failures never change the 200 status.
pub async fn index_handler(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    let (hit_count, redis_error) = match state.redis.incr(HIT_COUNTER_KEY).await {
        IncrOutcome::Incremented(n) => (Some(n), None),
        IncrOutcome::Unavailable => (None, None),
        IncrOutcome::Failed(reason) => (None, Some(reason)),
    };

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let response = IndexResponse {
        message: "Hello from labweb".to_string(),
        path: uri.path().to_string(),
        host,
        env: state.config.environment.clone(),
        hit_count,
        redis_error,
    };

    (StatusCode::OK, Json(response))
}
