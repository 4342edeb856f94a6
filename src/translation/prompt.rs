// Fixed prompt and output schema

use crate::models::Emotion;
use serde_json::{json, Value};

pub const SYSTEM_PROMPT: &str = "You are an expert affect-recognition assistant. Given a single face image, \
estimate the primary visible emotion among: happy, sad, angry, surprised, fearful, disgusted, neutral. \
Return a calibrated confidence in [0,1]. Then compose an original 6-8 line poem inspired by that emotion. \
Avoid describing the person's identity or attributes. Keep the poem PG and empathetic.";

pub const USER_INSTRUCTION: &str = "Infer emotion from this image and write a poem.";

/// Name of the structured output schema sent upstream.
pub const SCHEMA_NAME: &str = "poem_payload";

/// Strict schema: exactly `emotion`, `confidence`, `poem`, nothing else.
pub fn response_schema() -> Value {
    let labels: Vec<&str> = Emotion::ALL.iter().map(Emotion::as_str).collect();
    json!({
        "type": "object",
        "properties": {
            "emotion": { "type": "string", "enum": labels },
            "confidence": { "type": "number", "minimum": 0, "maximum": 1 },
            "poem": { "type": "string" }
        },
        "required": ["emotion", "confidence", "poem"],
        "additionalProperties": false
    })
}
