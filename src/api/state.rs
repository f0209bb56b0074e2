//! Application state shared across HTTP handlers

use std::time::Instant;

use crate::config::Config;
use crate::metrics::MetricsRegistry;
use crate::redis::RedisClient;

/// Shared application state
///
/// Built once in `main`, wrapped in an `Arc` and injected into every
/// handler; immutable for the process lifetime.
pub struct AppState {
    pub config: Config,
    pub metrics: MetricsRegistry,
    pub redis: RedisClient,
    pub started_at: Instant,
    pub hostname: String,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let redis = RedisClient::new(config.redis.clone());
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            config,
            metrics: MetricsRegistry::new(),
            redis,
            started_at: Instant::now(),
            hostname,
        }
    }

    /// Whole seconds since process start
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new(Config::default());
        assert_eq!(state.config.listen_port, 8080);
        assert_eq!(state.config.environment, "dev");
        assert!(!state.redis.is_configured());
        assert!(!state.hostname.is_empty());
    }

    #[test]
    fn test_uptime_is_monotone() {
        let state = AppState::new(Config::default());
        let first = state.uptime_seconds();
        let second = state.uptime_seconds();
        assert!(second >= first);
    }
}
