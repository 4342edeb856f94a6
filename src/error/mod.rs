// Error types for the emopoem relay

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("Malformed upstream payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// HTTP status and envelope `error.type` for this error.
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            RelayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            RelayError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "request_too_large"),
            RelayError::TooManyRequests(_) => (StatusCode::TOO_MANY_REQUESTS, "rate_limit_error"),
            RelayError::Upstream(_) => (StatusCode::BAD_GATEWAY, "api_error"),
            RelayError::MalformedPayload(_) => (StatusCode::BAD_GATEWAY, "upstream_payload_error"),
            RelayError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "overloaded_error")
            }
            RelayError::Config(_) | RelayError::ConfigParsing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "api_error"),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }
}

impl From<MultipartError> for RelayError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RelayError::PayloadTooLarge(err.body_text())
        } else {
            RelayError::InvalidRequest(format!("Malformed multipart body: {}", err.body_text()))
        }
    }
}

// Convert RelayError to HTTP responses for Axum
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.classify();

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
