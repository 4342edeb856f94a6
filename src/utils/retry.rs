// Retry logic with retry-after hint support

use backoff::{backoff::Backoff, ExponentialBackoff};
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::debug;

/// Upper bound for any server-suggested delay.
const MAX_HINT_DELAY: Duration = Duration::from_secs(60);

/// Status used for failures that never produced an HTTP response.
pub const TRANSPORT_FAILURE: u16 = 0;

/// A failed upstream attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptError {
    pub status: u16,
    pub body: String,
    /// Server-suggested delay before the next attempt.
    pub retry_after: Option<Duration>,
}

impl AttemptError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: TRANSPORT_FAILURE,
            body: message.into(),
            retry_after: None,
        }
    }
}

/// Read `retry-after-ms` or `retry-after` (seconds), capped at 60 seconds.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
    };

    let delay = header("retry-after-ms")
        .map(|ms| Duration::from_millis(ms as u64))
        .or_else(|| header("retry-after").map(Duration::from_secs_f64))?;

    Some(delay.min(MAX_HINT_DELAY))
}

/// Create exponential backoff configuration for retries
pub fn create_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: Duration::from_millis(500), // Start at 500ms
        initial_interval: Duration::from_millis(500),
        randomization_factor: 0.3,                    // Add jitter
        multiplier: 2.0,                              // Double each time
        max_interval: Duration::from_secs(30),        // Cap at 30s
        max_elapsed_time: Some(Duration::from_secs(120)), // Give up after 2 minutes
        ..Default::default()
    }
}

/// Determine if a failed attempt is worth repeating
pub fn is_retryable(status: u16) -> bool {
    matches!(status, TRANSPORT_FAILURE | 429 | 500 | 502 | 503 | 504)
}

/// Execute an operation, retrying up to `max_retries` extra times.
/// - Uses the server's retry-after hint if available
/// - Falls back to exponential backoff
/// - `max_retries == 0` runs the operation exactly once
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    max_retries: u32,
    mut operation: F,
) -> Result<T, AttemptError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AttemptError>>,
{
    let mut backoff = create_backoff();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(err) => {
                if !is_retryable(err.status) || attempt > max_retries {
                    return Err(err);
                }

                let delay = match err.retry_after {
                    Some(hint) => hint,
                    None => match backoff.next_backoff() {
                        Some(delay) => delay,
                        // Backoff budget exhausted
                        None => return Err(err),
                    },
                };

                debug!(
                    "{} failed with {} (attempt {}), retrying after {}ms",
                    operation_name,
                    err.status,
                    attempt,
                    delay.as_millis()
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_parse_retry_after() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert("retry-after", HeaderValue::from_static("2"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(2)));

        headers.insert("retry-after-ms", HeaderValue::from_static("457"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_millis(457)));
    }

    #[test]
    fn test_parse_retry_after_is_capped() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("120"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(60)));

        headers.insert("retry-after", HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn test_is_retryable() {
        assert!(is_retryable(TRANSPORT_FAILURE));
        assert!(is_retryable(429));
        assert!(is_retryable(500));
        assert!(is_retryable(503));
        assert!(!is_retryable(400));
        assert!(!is_retryable(401));
        assert!(!is_retryable(404));
    }

    #[test]
    fn test_no_retries_runs_once() {
        let calls = AtomicU32::new(0);
        let result: Result<(), AttemptError> = tokio_test::block_on(with_retry("test", 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AttemptError::transport("down")) }
        }));
        assert_eq!(result.unwrap_err().status, TRANSPORT_FAILURE);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry("test", 2, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(AttemptError {
                        status: 503,
                        body: "busy".to_string(),
                        retry_after: Some(Duration::from_millis(1)),
                    })
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), AttemptError> = with_retry("test", 3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(AttemptError {
                    status: 400,
                    body: "bad".to_string(),
                    retry_after: None,
                })
            }
        })
        .await;
        assert_eq!(result.unwrap_err().status, 400);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
