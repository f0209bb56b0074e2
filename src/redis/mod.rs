//! Redis store client module
//!
//! Provides the optional hit-counter dependency: a minimal RESP2 client
//! (`PING`, `SELECT`, `INCR`) with a guarded lazily-created connection.

mod client;
mod connection;

// Re-export public types and functions
pub use client::{IncrOutcome, RedisClient};
pub use connection::{RespValue, encode_command};
