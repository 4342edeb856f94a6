//! The inference relay: one image in, one structured analysis out.
//!
//! Each call validates and inlines the upload, issues a single chat-completion
//! request with the fixed prompt and strict schema, then sanitizes the payload
//! into an [`AnalysisResult`]. The relay holds no mutable state and is shared
//! across requests behind an `Arc`.

use crate::error::Result;
use crate::metrics;
use crate::models::{AnalysisRequest, AnalysisResult};
use crate::openai::OpenAiClient;
use crate::translation::{build_request, parse_analysis};
use crate::vision::InlineImage;
use tracing::{debug, info};

pub struct InferenceRelay {
    client: OpenAiClient,
}

impl InferenceRelay {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }

    /// Analyze one image.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult> {
        let image = InlineImage::prepare(&request)?;
        // Raw bytes are no longer needed once encoded
        drop(request);

        info!(
            "Analyzing {} image ({} base64 chars) with {}",
            image.mime_type(),
            image.data.len(),
            self.client.model()
        );

        let chat_request = build_request(self.client.model(), &image);
        let completion = self.client.chat_completion(&chat_request).await?;
        let result = parse_analysis(completion)?;

        debug!(
            "Analysis complete: emotion={}, confidence={:.2}",
            result.emotion, result.confidence
        );
        metrics::record_emotion(result.emotion);

        Ok(result)
    }
}
