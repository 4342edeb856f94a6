// Configuration module

mod models;

pub use models::*;

use crate::error::{RelayError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest, `EMOPOEM_SERVER__PORT` style)
    /// 2. Config file (`path`, or `~/.emopoem/config.toml` if present)
    /// 3. Defaults (lowest)
    ///
    /// The API key falls back to `OPENAI_API_KEY` when no source sets it.
    /// CLI flags are applied by the caller afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Self::default_config_path()).required(false),
        };

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix("EMOPOEM")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| RelayError::Config(e.to_string()))?;

        if app_config.openai.api_key.is_none() {
            app_config.openai.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        Ok(app_config)
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(RelayError::Config("server.port must be non-zero".to_string()));
        }
        if self.openai.model.trim().is_empty() {
            return Err(RelayError::Config("openai.model must not be empty".to_string()));
        }
        if !self.openai.api_base_url.starts_with("http://")
            && !self.openai.api_base_url.starts_with("https://")
        {
            return Err(RelayError::Config(format!(
                "openai.api_base_url must be an http(s) URL, got {}",
                self.openai.api_base_url
            )));
        }
        match self.openai.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(RelayError::Config(format!(
                "{} is not set and openai.api_key is not configured",
                API_KEY_ENV
            ))),
        }
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".emopoem")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.openai.api_key = Some("sk-test".to_string());
        config
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.max_retries, 0);
        assert_eq!(config.cors.allowed_origins.len(), 2);
    }

    #[test]
    fn test_validate_requires_api_key() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.openai.api_key = Some("   ".to_string());
        assert!(matches!(config.validate(), Err(RelayError::Config(_))));

        config.openai.api_key = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.openai.model = String::new();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.openai.api_base_url = "api.openai.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = valid_config();
        let debug = format!("{:?}", config.openai);
        assert!(!debug.contains("sk-test"));
        assert!(debug.contains("[REDACTED]"));
    }
}
