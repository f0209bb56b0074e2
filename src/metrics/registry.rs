//! Prometheus metrics registry for HTTP request instrumentation

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::labels::{EndpointLabels, RequestLabels};

/// Request duration buckets in seconds
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Arc<Mutex<Registry>>,
    http_requests: Family<RequestLabels, Counter>,
    http_request_duration_seconds: Family<EndpointLabels, Histogram>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let http_requests = Family::<RequestLabels, Counter>::default();
        registry.register(
            "labweb_http_requests",
            "HTTP requests by method, endpoint and status",
            http_requests.clone(),
        );

        let http_request_duration_seconds =
            Family::<EndpointLabels, Histogram>::new_with_constructor(|| {
                Histogram::new(DURATION_BUCKETS.iter().copied())
            });
        registry.register(
            "labweb_http_request_duration_seconds",
            "HTTP request latency in seconds by endpoint",
            http_request_duration_seconds.clone(),
        );

        Self {
            registry: Arc::new(Mutex::new(registry)),
            http_requests,
            http_request_duration_seconds,
        }
    }

    /// Records one handled request
    ///
    /// Counter and histogram cells are atomic, so concurrent in-flight
    /// requests can record the same label set without lost updates.
    pub fn record_request(&self, method: &str, endpoint: &str, status: u16, duration_secs: f64) {
        self.http_requests
            .get_or_create(&RequestLabels {
                method: method.to_string(),
                endpoint: endpoint.to_string(),
                status: status.to_string(),
            })
            .inc();
        self.http_request_duration_seconds
            .get_or_create(&EndpointLabels {
                endpoint: endpoint.to_string(),
            })
            .observe(duration_secs.max(0.0));
    }

    /// Ensures counter cells for a route exist from startup so rates can be
    /// computed before the first request arrives
    pub fn initialize_endpoint(&self, endpoint: &str) {
        let _ = self.http_request_duration_seconds.get_or_create(&EndpointLabels {
            endpoint: endpoint.to_string(),
        });
    }

    /// Renders the current snapshot in the text exposition format
    pub async fn encode_metrics(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let registry = self.registry.lock().await;
        let mut buffer = String::new();
        encode(&mut buffer, &registry)?;
        Ok(buffer)
    }

    /// Counter value for a label set, used by tests
    #[must_use]
    pub fn request_count(&self, method: &str, endpoint: &str, status: u16) -> u64 {
        self.http_requests
            .get_or_create(&RequestLabels {
                method: method.to_string(),
                endpoint: endpoint.to_string(),
                status: status.to_string(),
            })
            .get()
    }
}
