use super::*;

#[test]
fn test_request_serializes_camel_case() {
    let request = GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::Text {
                    text: "describe".to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: "image/png".to_string(),
                        data: "AAAA".to_string(),
                    },
                },
            ],
        }],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            temperature: Some(0.0),
            max_output_tokens: Some(256),
            response_mime_type: None,
        }),
    };

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["generationConfig"]["maxOutputTokens"], 256);
    assert_eq!(json["contents"][0]["parts"][1]["inline_data"]["mime_type"], "image/png");
    assert!(json.get("systemInstruction").is_none());
}

#[test]
fn test_response_text_joins_parts() {
    let response: GenerateContentResponse = serde_json::from_str(
        r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "[{\"purpose\""}, {"text": ": \"x\"}]"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 4, "totalTokenCount": 14},
            "responseId": "abc"
        }"#,
    )
    .unwrap();

    assert_eq!(response.text().unwrap(), "[{\"purpose\": \"x\"}]");
    assert_eq!(response.usage_metadata.unwrap().total_token_count, 14);
    assert_eq!(response.response_id.as_deref(), Some("abc"));
}

#[test]
fn test_blocked_prompt_has_no_text() {
    let response: GenerateContentResponse =
        serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
    assert!(response.text().is_none());
    assert_eq!(
        response.prompt_feedback.unwrap().block_reason.as_deref(),
        Some("SAFETY")
    );
}

#[test]
fn test_error_body() {
    let error: GeminiError = serde_json::from_str(
        r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#,
    )
    .unwrap();
    assert_eq!(error.error.code, 429);
    assert_eq!(error.error.status, "RESOURCE_EXHAUSTED");
}
