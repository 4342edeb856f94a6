// Metrics module for Prometheus observability

mod registry;

pub use registry::{
    gather_metrics, EMOTIONS_TOTAL, REQUESTS_TOTAL, REQUEST_DURATION, TOKENS_TOTAL,
    UPSTREAM_CALLS, UPSTREAM_DURATION,
};

use crate::models::openai::Usage;
use crate::models::Emotion;

/// Helper to record request metrics
pub fn record_request(method: &str, endpoint: &str, status_code: u16, duration_secs: f64) {
    let status = status_code.to_string();
    REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status])
        .inc();

    REQUEST_DURATION
        .with_label_values(&[method, endpoint, &status])
        .observe(duration_secs);
}

/// Helper to record upstream API call metrics. Status `0` is a transport failure.
pub fn record_upstream_call(model: &str, status_code: u16, duration_secs: f64) {
    UPSTREAM_CALLS
        .with_label_values(&[model, &status_code.to_string()])
        .inc();

    UPSTREAM_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}

/// Helper to record token usage
pub fn record_tokens(model: &str, usage: &Usage) {
    if usage.prompt_tokens > 0 {
        TOKENS_TOTAL
            .with_label_values(&[model, "input"])
            .inc_by(usage.prompt_tokens as f64);
    }
    if usage.completion_tokens > 0 {
        TOKENS_TOTAL
            .with_label_values(&[model, "output"])
            .inc_by(usage.completion_tokens as f64);
    }
}

pub fn record_emotion(emotion: Emotion) {
    EMOTIONS_TOTAL.with_label_values(&[emotion.as_str()]).inc();
}
