//! Request and response conversion.

use wayfinder_protocols::{CompletionRequest, CompletionResponse, ProviderError, Usage};

use crate::api::*;

/// Build the chat messages: optional system message, then one user message
/// carrying the prompt and image (when allowed).
pub fn convert_messages(request: &CompletionRequest, send_image: bool) -> Vec<ApiMessage> {
    let mut messages = Vec::with_capacity(2);

    if let Some(system) = &request.system {
        messages.push(ApiMessage {
            role: "system".to_string(),
            content: MessageContent::Text(system.clone()),
        });
    }

    let content = match (&request.image, send_image) {
        (Some(image), true) => MessageContent::Parts(vec![
            ContentPart::Text {
                text: request.prompt.clone(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.data_uri(),
                    detail: Some("high".to_string()),
                },
            },
        ]),
        _ => MessageContent::Text(request.prompt.clone()),
    };
    messages.push(ApiMessage {
        role: "user".to_string(),
        content,
    });

    messages
}

pub fn parse_response(
    response: ApiResponse,
    fallback_model: &str,
) -> Result<CompletionResponse, ProviderError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ProviderError::InvalidResponse("response has no message content".to_string()))?;

    let model = if response.model.is_empty() {
        fallback_model.to_string()
    } else {
        response.model
    };
    let mut completion = CompletionResponse::new(response.id, model, text);
    if let Some(usage) = response.usage {
        completion.usage = Usage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        };
    }
    Ok(completion)
}

/// Classify an error response body.
pub fn parse_error(status: u16, body: String) -> ProviderError {
    let message = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(e) => match e.error.error_type {
            Some(t) if !t.is_empty() => format!("{} ({})", e.error.message, t),
            _ => e.error.message,
        },
        Err(_) => body,
    };
    ProviderError::from_api_response(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_protocols::ImageInput;

    #[test]
    fn test_messages_with_image() {
        let request = CompletionRequest::new("list")
            .with_system("sys")
            .with_image(ImageInput::png(&[1]));
        let messages = convert_messages(&request, true);

        assert_eq!(messages.len(), 2);
        let json = serde_json::to_value(&messages[1]).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert!(
            json["content"][1]["image_url"]["url"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );
    }

    #[test]
    fn test_image_dropped_when_not_supported() {
        let request = CompletionRequest::new("list").with_image(ImageInput::png(&[1]));
        let messages = convert_messages(&request, false);
        let json = serde_json::to_value(&messages[0]).unwrap();
        assert_eq!(json["content"], "list");
    }

    #[test]
    fn test_parse_error_rate_limit() {
        let err = parse_error(
            429,
            r#"{"error": {"message": "Rate limit reached for model", "type": "tokens"}}"#.to_string(),
        );
        assert!(err.is_quota_error());
    }

    #[test]
    fn test_parse_error_plain_body() {
        let err = parse_error(502, "Bad Gateway".to_string());
        assert!(matches!(err, ProviderError::ApiError { status: 502, .. }));
    }

    #[test]
    fn test_parse_response_without_content() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"id": "x", "model": "m", "choices": []}"#).unwrap();
        assert!(matches!(
            parse_response(response, "m"),
            Err(ProviderError::InvalidResponse(_))
        ));
    }
}
