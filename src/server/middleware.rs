// HTTP middleware

use crate::config::CorsConfig;
use crate::error::{RelayError, Result};
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Create request ID layers for the application
pub fn request_id_layers() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    (
        SetRequestIdLayer::x_request_id(MakeRequestUuid),
        PropagateRequestIdLayer::x_request_id(),
    )
}

/// Build the CORS layer from configuration.
///
/// Credentialed CORS forbids wildcards, so methods and headers mirror the
/// preflight request instead.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim())
                .map_err(|e| RelayError::Config(format!("Invalid CORS origin {}: {}", origin, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_accepts_defaults() {
        assert!(cors_layer(&CorsConfig::default()).is_ok());
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let config = CorsConfig {
            allowed_origins: vec!["http://bad\norigin".to_string()],
            allow_credentials: true,
        };
        assert!(matches!(cors_layer(&config), Err(RelayError::Config(_))));
    }
}
