//! Configuration data structures for the emopoem relay.
//!
//! This module defines the schema for the application settings: the HTTP
//! server, the upstream completion API, CORS and logging.

use serde::{Deserialize, Serialize};

/// Environment variable that supplies the upstream API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, upload limit).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream completion API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Cross-origin settings for browser clients.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8000`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body, multipart framing included.
    /// Default: 25 MiB
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Settings for the upstream chat-completion API.
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix.
    /// Default: `https://api.openai.com/v1`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer credential. Falls back to `OPENAI_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Multimodal model used for every analysis.
    /// Default: `gpt-4o-mini`
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    /// Default: `120`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Retries for transient upstream failures. `0` disables retrying.
    /// Default: `0`
    #[serde(default)]
    pub max_retries: u32,
}

/// Cross-origin resource sharing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API. `*` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Whether browsers may send credentials. Ignored for `*`.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub allow_credentials: bool,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: None,
            model: default_model(),
            timeout_seconds: default_timeout(),
            max_retries: 0,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allow_credentials: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_allowed_origins() -> Vec<String> {
    // Vite dev server
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
