use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AppState;

/// Health check endpoint response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub hostname: String,
    pub env: String,
    pub redis_ok: bool,
}

/// GET /health
///
/// Always returns 200 with status "ok". Store unavailability is signalled
/// solely through `redis_ok`, never through the status code.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let redis_ok = state.redis.ping().await;

    let response = HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: state.uptime_seconds(),
        hostname: state.hostname.clone(),
        env: state.config.environment.clone(),
        redis_ok,
    };

    (StatusCode::OK, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_health_check_without_store() {
        let state = Arc::new(AppState::new(Config::default()));
        let response = health_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
