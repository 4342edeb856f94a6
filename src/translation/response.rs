// Response translation (chat completion → AnalysisResult)

use crate::error::{RelayError, Result};
use crate::models::openai::ChatCompletionResponse;
use crate::models::{AnalysisResult, Emotion, DEFAULT_CONFIDENCE};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Lazily initialized regex for a Markdown code fence around the payload
static CODE_FENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_code_fence_regex() -> &'static Regex {
    CODE_FENCE_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^```(?:json)?\s*(.*?)\s*```$").expect("Invalid regex pattern")
    })
}

/// Payload as the model emits it. Every field may be missing.
#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default)]
    emotion: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    poem: Option<String>,
}

/// Extract the analysis from a chat-completion response.
pub fn parse_analysis(resp: ChatCompletionResponse) -> Result<AnalysisResult> {
    let choice = resp.choices.into_iter().next().ok_or_else(|| {
        RelayError::MalformedPayload("No choices in upstream response".to_string())
    })?;

    debug!("Response finish_reason: {:?}", choice.finish_reason);

    if let Some(refusal) = choice.message.refusal {
        return Err(RelayError::MalformedPayload(format!(
            "Upstream model refused: {}",
            refusal
        )));
    }

    let content = choice
        .message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| RelayError::MalformedPayload("Empty message content".to_string()))?;

    parse_payload(&content)
}

/// Parse the textual payload, apply field defaults, clamp confidence.
pub fn parse_payload(content: &str) -> Result<AnalysisResult> {
    let trimmed = content.trim();
    let json_text = get_code_fence_regex()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str());

    let raw: RawPayload = serde_json::from_str(json_text)
        .map_err(|e| RelayError::MalformedPayload(format!("Payload is not valid JSON: {}", e)))?;

    let emotion = match raw.emotion {
        Some(label) => label
            .parse::<Emotion>()
            .map_err(RelayError::MalformedPayload)?,
        None => {
            warn!("Upstream payload omitted emotion, defaulting to neutral");
            Emotion::default()
        }
    };

    let confidence = raw.confidence.unwrap_or_else(|| {
        warn!("Upstream payload omitted confidence, defaulting to {}", DEFAULT_CONFIDENCE);
        DEFAULT_CONFIDENCE
    });

    let poem = raw.poem.unwrap_or_else(|| {
        warn!("Upstream payload omitted poem");
        String::new()
    });

    Ok(AnalysisResult::new(emotion, confidence, poem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(content: serde_json::Value) -> ChatCompletionResponse {
        serde_json::from_value(serde_json::json!({
            "id": "chatcmpl-test",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_complete_payload() {
        let result =
            parse_payload(r#"{"emotion":"happy","confidence":0.92,"poem":"Sun on the step"}"#)
                .unwrap();
        assert_eq!(result, AnalysisResult::new(Emotion::Happy, 0.92, "Sun on the step"));
    }

    #[test]
    fn test_confidence_is_clamped() {
        let high = parse_payload(r#"{"emotion":"sad","confidence":1.4,"poem":"x"}"#).unwrap();
        assert_eq!(high.confidence, 1.0);
        let low = parse_payload(r#"{"emotion":"sad","confidence":-0.2,"poem":"x"}"#).unwrap();
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let result = parse_payload(r#"{"poem":"quiet"}"#).unwrap();
        assert_eq!(result.emotion, Emotion::Neutral);
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(result.poem, "quiet");

        let nulls = parse_payload(r#"{"emotion":null,"confidence":null}"#).unwrap();
        assert_eq!(nulls.emotion, Emotion::Neutral);
        assert_eq!(nulls.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(nulls.poem, "");
    }

    #[test]
    fn test_fenced_payload() {
        let result =
            parse_payload("```json\n{\"emotion\":\"angry\",\"confidence\":0.7,\"poem\":\"p\"}\n```")
                .unwrap();
        assert_eq!(result.emotion, Emotion::Angry);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(parse_payload("not json"), Err(RelayError::MalformedPayload(_))));
        assert!(matches!(
            parse_payload(r#"{"emotion":"bored","confidence":0.5,"poem":"p"}"#),
            Err(RelayError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_payload(r#"{"emotion":"sad","confidence":"high","poem":"p"}"#),
            Err(RelayError::MalformedPayload(_))
        ));
        assert!(parse_payload("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_parse_analysis_from_completion() {
        let resp = completion(serde_json::json!(
            r#"{"emotion":"surprised","confidence":0.61,"poem":"Eyes wide"}"#
        ));
        let result = parse_analysis(resp).unwrap();
        assert_eq!(result.emotion, Emotion::Surprised);
        assert_eq!(result.confidence, 0.61);
    }

    #[test]
    fn test_parse_analysis_errors() {
        let empty = completion(serde_json::Value::Null);
        assert!(matches!(parse_analysis(empty), Err(RelayError::MalformedPayload(_))));

        let no_choices: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(parse_analysis(no_choices).is_err());

        let refused: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":null,"refusal":"no"}}]}"#,
        )
        .unwrap();
        let err = parse_analysis(refused).unwrap_err();
        assert!(err.to_string().contains("refused"));
    }
}
