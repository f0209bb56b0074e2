//! Metrics module for the labweb service
//!
//! Contains label types and the Prometheus metrics registry.

mod labels;
mod registry;

/// Labels for request counters and latency histograms
pub use labels::{EndpointLabels, RequestLabels};

/// Prometheus metrics registry
pub use registry::MetricsRegistry;
