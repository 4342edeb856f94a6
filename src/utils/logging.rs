//! Structured logging and credential scrubbing.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides a helper that keeps API keys and bearer tokens out of log sinks
//! and error bodies.

use crate::config::LoggingConfig;
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

static API_KEY_REGEX: OnceLock<Regex> = OnceLock::new();
static BEARER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Sanitizes sensitive information from log messages.
///
/// Replaces OpenAI-style API keys (`sk-...`, including `sk-proj-...`) and
/// `Bearer` tokens with placeholders. Upstream error bodies echo partial keys,
/// so anything derived from them passes through here first.
pub fn sanitize(input: &str) -> String {
    let api_key = API_KEY_REGEX
        .get_or_init(|| Regex::new(r"sk-[A-Za-z0-9_\-*]{4,}").expect("Invalid regex pattern"));
    let bearer = BEARER_REGEX.get_or_init(|| {
        Regex::new(r"(?i)bearer\s+[A-Za-z0-9._\-~+/]+=*").expect("Invalid regex pattern")
    });

    let result = api_key.replace_all(input, "[REDACTED_API_KEY]");
    bearer
        .replace_all(&result, "Bearer [REDACTED_TOKEN]")
        .into_owned()
}
