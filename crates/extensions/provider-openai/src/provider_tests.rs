use super::*;
use wayfinder_protocols::ImageInput;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

fn ok_body(text: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-123",
        "model": "llama-3.2-90b-vision-preview",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
    .to_string()
}

#[test]
fn test_provider_creation() {
    let provider = OpenAIProvider::new("openai", None);
    assert_eq!(provider.id(), "openai");
    assert_eq!(provider.model(), "gpt-4o-mini");
    assert!(provider.capabilities().vision);

    let text_only = OpenAIProvider::new("groq", Some("llama-3.1-8b".to_string())).with_vision(false);
    assert!(!text_only.capabilities().vision);
}

#[test]
fn test_build_request_uses_configured_model() {
    let provider = OpenAIProvider::new("groq", Some("llama-3.2-90b-vision-preview".to_string()));
    let request = CompletionRequest::new("hi").with_max_tokens(64);
    let api = provider.build_request(&request);
    assert_eq!(api.model, "llama-3.2-90b-vision-preview");
    assert_eq!(api.max_tokens, Some(64));
}

#[tokio::test]
async fn test_complete_success() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/"))
        .and(matchers::header("Authorization", "Bearer gsk-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ok_body("[]")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::with_url("groq", None, mock_server.uri());
    let request = CompletionRequest::new("list").with_image(ImageInput::png(&[9]));
    let response = provider.complete(request, "gsk-1").await.unwrap();

    assert_eq!(response.text, "[]");
    assert_eq!(response.id, "chatcmpl-123");
    assert_eq!(response.usage.total_tokens, 15);
}

#[tokio::test]
async fn test_complete_auth_error() {
    let mock_server = MockServer::start().await;

    let error_body = r#"{"error": {"message": "Invalid API key", "type": "invalid_request_error"}}"#;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/"))
        .respond_with(ResponseTemplate::new(401).set_body_string(error_body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::with_url("openai", None, mock_server.uri());
    let err = provider
        .complete(CompletionRequest::new("hi"), "bad-key")
        .await
        .unwrap_err();
    assert!(err.is_auth_error());
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn test_complete_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string(
            r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#,
        ))
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::with_url("groq", None, mock_server.uri());
    let err = provider
        .complete(CompletionRequest::new("hi"), "gsk-1")
        .await
        .unwrap_err();
    assert!(err.is_quota_error());
}

#[tokio::test]
async fn test_complete_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let provider = OpenAIProvider::with_url("groq", None, mock_server.uri());
    let err = provider
        .complete(CompletionRequest::new("hi"), "gsk-1")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}
