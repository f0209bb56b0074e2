//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for convenient use.
//! Users of the library can import everything they need with:
//!
//! ```rust
//! use labweb::prelude::*;
//! ```

// Core types
pub use crate::config::{Config, RedisConfig};
pub use crate::error::{AppError, Result};

// HTTP API
pub use crate::api::{AppState, create_router, route_name};

// Metrics types
pub use crate::metrics::{EndpointLabels, MetricsRegistry, RequestLabels};

// Redis store client
pub use crate::redis::{IncrOutcome, RedisClient, RespValue};
