use super::*;

#[test]
fn test_completion_request_new() {
    let request = CompletionRequest::new("Describe this page");
    assert_eq!(request.prompt, "Describe this page");
    assert!(request.system.is_none());
    assert!(!request.has_image());
}

#[test]
fn test_completion_request_builder_chain() {
    let request = CompletionRequest::new("prompt")
        .with_system("You are precise")
        .with_image(ImageInput::png(&[0x89, 0x50, 0x4e, 0x47]))
        .with_max_tokens(1024)
        .with_temperature(0.0)
        .with_timeout(45);
    assert_eq!(request.system.as_deref(), Some("You are precise"));
    assert!(request.has_image());
    assert_eq!(request.max_tokens, Some(1024));
    assert_eq!(request.temperature, Some(0.0));
    assert_eq!(request.timeout_seconds, Some(45));
}

#[test]
fn test_image_input_png_encoding() {
    let image = ImageInput::png(b"abc");
    assert_eq!(image.media_type, "image/png");
    assert_eq!(image.data, "YWJj");
    assert_eq!(image.data_uri(), "data:image/png;base64,YWJj");
}

#[test]
fn test_request_serialization_skips_empty_fields() {
    let request = CompletionRequest::new("hello");
    let json = serde_json::to_string(&request).unwrap();
    assert!(json.contains("hello"));
    assert!(!json.contains("image"));
    assert!(!json.contains("system"));
}
