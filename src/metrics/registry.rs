// Prometheus metrics registry and collectors

use crate::error::{RelayError, Result};
use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Total number of HTTP requests
    pub static ref REQUESTS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("requests_total", "Total number of API requests"),
        &["method", "endpoint", "status_code"],
        REGISTRY
    ).expect("requests_total registers once");

    /// Request duration histogram
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        HistogramOpts::new("request_duration_seconds", "Request duration in seconds")
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["method", "endpoint", "status_code"],
        REGISTRY
    ).expect("request_duration_seconds registers once");

    // ============================================================================
    // UPSTREAM API METRICS
    // ============================================================================

    /// Total upstream chat-completion calls
    pub static ref UPSTREAM_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("upstream_calls_total", "Total upstream completion API calls"),
        &["model", "status_code"],
        REGISTRY
    ).expect("upstream_calls_total registers once");

    /// Upstream call duration, retries included
    pub static ref UPSTREAM_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        HistogramOpts::new("upstream_duration_seconds", "Upstream completion API call duration")
            .buckets(vec![0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["model"],
        REGISTRY
    ).expect("upstream_duration_seconds registers once");

    /// Total tokens reported by the upstream API
    pub static ref TOKENS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("tokens_total", "Total tokens processed"),
        &["model", "type"], // type: input, output
        REGISTRY
    ).expect("tokens_total registers once");

    // ============================================================================
    // ANALYSIS METRICS
    // ============================================================================

    /// Emotions returned to callers
    pub static ref EMOTIONS_TOTAL: CounterVec = register_counter_vec_with_registry!(
        Opts::new("emotions_total", "Emotions returned by analyses"),
        &["emotion"],
        REGISTRY
    ).expect("emotions_total registers once");
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| RelayError::Internal(format!("Failed to encode metrics: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| RelayError::Internal(format!("Metrics are not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Vec collectors only appear once a label set is observed
        REQUESTS_TOTAL.with_label_values(&["GET", "/health", "200"]).inc();
        UPSTREAM_CALLS.with_label_values(&["gpt-4o-mini", "200"]).inc();
        EMOTIONS_TOTAL.with_label_values(&["neutral"]).inc();

        let metrics = gather_metrics().unwrap();
        assert!(metrics.contains("requests_total"));
        assert!(metrics.contains("upstream_calls_total"));
        assert!(metrics.contains("emotions_total"));
    }
}
