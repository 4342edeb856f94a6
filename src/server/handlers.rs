// HTTP request handlers

use super::routes::AppState;
use crate::error::{RelayError, Result};
use crate::metrics;
use crate::models::{AnalysisRequest, AnalysisResult};
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Liveness only; never touches the upstream API.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Handler for `POST /analyze`
pub async fn analyze_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>> {
    let start = Instant::now();

    let outcome = analyze_upload(&state, multipart).await;

    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            warn!("Analysis failed: {}", e);
            e.status_code()
        }
    };
    metrics::record_request(
        "POST",
        "/analyze",
        status.as_u16(),
        start.elapsed().as_secs_f64(),
    );

    outcome.map(Json)
}

async fn analyze_upload(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<AnalysisResult> {
    let mut multipart = multipart.map_err(|e| RelayError::InvalidRequest(e.body_text()))?;
    let request = read_image_field(&mut multipart).await?;
    state.relay.analyze(request).await
}

/// Pull the `image` file part out of the form. Other fields are skipped.
async fn read_image_field(multipart: &mut Multipart) -> Result<AnalysisRequest> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let media_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;

        debug!(
            "Received upload {:?}: {} bytes, declared type {:?}",
            file_name,
            bytes.len(),
            media_type
        );

        return Ok(AnalysisRequest::new(bytes, media_type));
    }

    Err(RelayError::InvalidRequest(format!(
        "Missing multipart file field '{}'",
        IMAGE_FIELD
    )))
}

/// Prometheus scrape endpoint
pub async fn metrics_handler() -> Result<Response> {
    let body = metrics::gather_metrics()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response())
}
