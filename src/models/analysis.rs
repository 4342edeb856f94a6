// Analysis domain types

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Confidence reported when the upstream payload omits one.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Primary visible emotion, restricted to a closed set of seven labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Surprised,
    Fearful,
    Disgusted,
    #[default]
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprised,
        Emotion::Fearful,
        Emotion::Disgusted,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Fearful => "fearful",
            Emotion::Disgusted => "disgusted",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Emotion::ALL
            .into_iter()
            .find(|emotion| emotion.as_str() == normalized)
            .ok_or_else(|| format!("Unknown emotion label: {}", s))
    }
}

/// An uploaded image awaiting analysis.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image_bytes: Bytes,
    /// Media type declared by the client, if any.
    pub media_type: Option<String>,
}

impl AnalysisRequest {
    pub fn new(image_bytes: impl Into<Bytes>, media_type: Option<String>) -> Self {
        Self {
            image_bytes: image_bytes.into(),
            media_type,
        }
    }
}

/// Result returned to the caller of `/analyze`.
///
/// `confidence` is always within `[0, 1]`; construct through [`AnalysisResult::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub emotion: Emotion,
    pub confidence: f64,
    pub poem: String,
}

impl AnalysisResult {
    pub fn new(emotion: Emotion, confidence: f64, poem: impl Into<String>) -> Self {
        Self {
            emotion,
            confidence: clamp_confidence(confidence),
            poem: poem.into(),
        }
    }
}

/// Clamp a confidence into `[0, 1]`. NaN maps to the default confidence.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_CONFIDENCE
    } else {
        value.clamp(0.0, 1.0)
    }
}
