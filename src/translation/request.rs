// Request translation (image → chat completion)

use super::prompt::{response_schema, SCHEMA_NAME, SYSTEM_PROMPT, USER_INSTRUCTION};
use crate::models::openai::{
    ChatCompletionRequest, ChatMessage, ContentPart, ImageUrl, MessageContent, ResponseFormat, Role,
};
use crate::vision::InlineImage;

/// Build the single chat-completion request for one image.
pub fn build_request(model: &str, image: &InlineImage) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: Role::System,
                content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
            },
            ChatMessage {
                role: Role::User,
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: USER_INSTRUCTION.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                            detail: None,
                        },
                    },
                ]),
            },
        ],
        response_format: Some(ResponseFormat::json_schema(SCHEMA_NAME, response_schema())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::ImageFormat;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let image = InlineImage {
            format: ImageFormat::Jpeg,
            data: "/9j/4AAQ".to_string(),
        };
        let value = serde_json::to_value(build_request("gpt-4o-mini", &image)).unwrap();

        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(
            value["messages"][1]["content"],
            json!([
                {"type": "text", "text": USER_INSTRUCTION},
                {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,/9j/4AAQ"}}
            ])
        );
        assert_eq!(value["response_format"]["type"], "json_schema");
        assert_eq!(value["response_format"]["json_schema"]["name"], "poem_payload");
        assert_eq!(value["response_format"]["json_schema"]["strict"], true);
    }
}
