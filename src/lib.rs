//! # labweb
//!
//! Small instrumented web service: a health endpoint, a demo index endpoint
//! backed by an optional Redis hit counter, and Prometheus metrics.
//!
//! ## Main modules
//! - `api`: HTTP handlers, routing and request-timing middleware
//! - `config`: configuration management
//! - `error`: error types
//! - `metrics`: metrics labels and registry
//! - `redis`: optional Redis store client
//! - `prelude`: commonly used types and traits

mod api;
mod config;
mod error;
mod metrics;
mod redis;
pub mod prelude;

// Re-export commonly used types
/// Application configuration
pub use config::{Config, RedisConfig};

/// Application error and result type
pub use error::{AppError, Result};

/// HTTP API router, state and route naming
pub use api::{AppState, create_router, route_name};

/// Metrics registry and labels
pub use metrics::{EndpointLabels, MetricsRegistry, RequestLabels};

/// Redis store client and increment outcome
pub use redis::{IncrOutcome, RedisClient};

/// RESP command encoding (public for tests)
pub use redis::encode_command;
