// Chat-completion API client

use crate::config::OpenAiConfig;
use crate::error::{RelayError, Result};
use crate::metrics;
use crate::models::openai::{ChatCompletionRequest, ChatCompletionResponse};
use crate::utils::logging::sanitize;
use crate::utils::retry::{parse_retry_after, with_retry, AttemptError, TRANSPORT_FAILURE};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};
use zeroize::Zeroizing;

/// Client for an OpenAI-compatible chat-completion API.
///
/// Built once at startup and shared read-only by every request. The
/// underlying `reqwest::Client` pools connections internally.
pub struct OpenAiClient {
    http_client: Client,
    config: OpenAiConfig,
    api_key: Zeroizing<String>,
}

impl OpenAiClient {
    /// Create a new client. The key is held in memory that is wiped on drop.
    pub fn new(config: &OpenAiConfig, api_key: String) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            config: config.clone(),
            api_key: Zeroizing::new(api_key),
        })
    }

    /// Model every request is sent to
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Get the API base_url
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    /// Call `POST /chat/completions`.
    ///
    /// Failures are returned as-is unless `max_retries` is configured.
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_base_url.trim_end_matches('/')
        );
        let url = url.as_str();
        debug!("Calling chat completions for model: {}", request.model);

        let start = Instant::now();
        let outcome = with_retry("Chat completion", self.config.max_retries, || async move {
            let response = self
                .http_client
                .post(url)
                .bearer_auth(self.api_key.as_str())
                .json(request)
                .send()
                .await
                .map_err(|e| AttemptError::transport(sanitize(&e.to_string())))?;

            let status = response.status();
            if !status.is_success() {
                let retry_after = parse_retry_after(response.headers());
                let error_text = response.text().await.unwrap_or_default();
                let message = extract_error_message(&error_text).unwrap_or(error_text);
                return Err(AttemptError {
                    status: status.as_u16(),
                    body: sanitize(&message),
                    retry_after,
                });
            }

            response
                .text()
                .await
                .map_err(|e| AttemptError::transport(format!("Failed to read response body: {}", e)))
        })
        .await;

        let elapsed = start.elapsed();
        let status_label = match &outcome {
            Ok(_) => 200,
            Err(err) => err.status,
        };
        metrics::record_upstream_call(&request.model, status_label, elapsed.as_secs_f64());

        let response_text = outcome.map_err(|err| {
            error!("Upstream API error: HTTP {} - {}", err.status, err.body);
            map_attempt_error(err)
        })?;

        debug!(
            "Upstream responded in {:?} (first 500 chars): {}",
            elapsed,
            response_text.chars().take(500).collect::<String>()
        );

        let completion: ChatCompletionResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!("Failed to parse upstream response: {}", e);
                RelayError::MalformedPayload(format!("Response parsing error: {}", e))
            })?;

        if let Some(usage) = &completion.usage {
            metrics::record_tokens(&request.model, usage);
        }

        Ok(completion)
    }
}

/// Map a final failed attempt onto the relay's error taxonomy
fn map_attempt_error(err: AttemptError) -> RelayError {
    match err.status {
        TRANSPORT_FAILURE => RelayError::Upstream(format!("HTTP error: {}", err.body)),
        401 | 403 => RelayError::Upstream(format!("Upstream rejected credentials: {}", err.body)),
        429 => RelayError::TooManyRequests(format!("Upstream quota exceeded: {}", err.body)),
        503 | 504 => RelayError::ServiceUnavailable(format!("Upstream unavailable: {}", err.body)),
        status => RelayError::Upstream(format!("HTTP {}: {}", status, err.body)),
    }
}

/// Extract error message from API response JSON
fn extract_error_message(response_text: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorResponse {
        error: Option<ErrorDetail>,
    }

    #[derive(serde::Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
        code: Option<String>,
    }

    let error = serde_json::from_str::<ErrorResponse>(response_text)
        .ok()?
        .error?;
    error.message.or(error.code)
}
