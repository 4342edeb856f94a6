// HTTP routes configuration

use super::handlers::{analyze_handler, health_handler, metrics_handler};
use super::middleware::{cors_layer, request_id_layers};
use crate::config::AppConfig;
use crate::error::Result;
use crate::relay::InferenceRelay;
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<InferenceRelay>,
}

pub fn create_router(config: &AppConfig, relay: InferenceRelay) -> Result<Router> {
    let state = AppState {
        relay: Arc::new(relay),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/analyze", post(analyze_handler))
        .route("/metrics", get(metrics_handler))
        // Overflow surfaces as a multipart error, so it gets the JSON envelope
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(cors_layer(&config.cors)?)
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
