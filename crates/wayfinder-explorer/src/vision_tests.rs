use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use wayfinder_protocols::{
    CompletionResponse, ModelProvider, ProviderCapabilities, ProviderError,
};
use wayfinder_resilience::{
    CircuitBreaker, CircuitBreakerConfig, KeyPool, ProviderRoute, RetryConfig,
};

#[test]
fn test_parse_bare_array() {
    let elements = parse_elements(
        r#"[{"purpose": "open settings", "text": "Settings",
             "bounds": {"x": 10, "y": 20, "width": 100, "height": 30}}]"#,
    );
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].purpose, "open settings");
    assert_eq!(elements[0].text.as_deref(), Some("Settings"));
    assert_eq!(elements[0].bounds, Bounds::new(10.0, 20.0, 100.0, 30.0));
}

#[test]
fn test_parse_fenced_object_with_prose() {
    let response = "Here is what I found:\n```json\n{\"elements\": [\
        {\"purpose\": \"log out\", \"bounds\": [1, 2, 3, 4]}]}\n```\nHope this helps.";
    let elements = parse_elements(response);
    assert_eq!(elements.len(), 1);
    assert!(elements[0].text.is_none());
    assert_eq!(elements[0].bounds.height, 4.0);
}

#[test]
fn test_parse_array_inside_prose() {
    let response = "Sure! [{\"description\": \"go home\", \"x\": 0, \"y\": 0, \
        \"width\": 5, \"height\": 5}] Anything else?";
    let elements = parse_elements(response);
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].purpose, "go home");
}

#[test]
fn test_parse_drops_incomplete_items() {
    let elements = parse_elements(
        r#"[{"purpose": "", "bounds": {"x": 1, "y": 1, "width": 1, "height": 1}},
            {"purpose": "no bounds"},
            {"purpose": "zero size", "bounds": {"x": 1, "y": 1, "width": 0, "height": 1}},
            {"purpose": "ok", "text": "null", "bounds": {"x": 1, "y": 1, "width": 1, "height": 1}}]"#,
    );
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].purpose, "ok");
    assert!(elements[0].text.is_none());
}

#[test]
fn test_parse_malformed_yields_empty() {
    assert!(parse_elements("I can't see any buttons.").is_empty());
    assert!(parse_elements("[{\"purpose\": ").is_empty());
    assert!(parse_elements("").is_empty());
    assert!(parse_elements("{\"status\": \"ok\"}").is_empty());
}

struct CannedProvider {
    text: String,
    capabilities: ProviderCapabilities,
    calls: AtomicUsize,
}

#[async_trait]
impl ModelProvider for CannedProvider {
    fn id(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "canned-vision"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(
        &self,
        request: CompletionRequest,
        _api_key: &str,
    ) -> Result<CompletionResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(request.has_image());
        assert!(request.prompt.contains("JSON"));
        Ok(CompletionResponse::new("1", "canned-vision", self.text.clone()))
    }
}

fn router_with(provider: Arc<CannedProvider>) -> Arc<ProviderRouter> {
    let route = ProviderRoute::new(
        provider,
        Arc::new(KeyPool::new("canned", ["k"], 10)),
        Arc::new(CircuitBreaker::new("canned", CircuitBreakerConfig::default())),
    );
    Arc::new(ProviderRouter::new(RetryConfig::none()).with_route(route))
}

fn canned(text: &str, vision: bool) -> Arc<CannedProvider> {
    Arc::new(CannedProvider {
        text: text.to_string(),
        capabilities: ProviderCapabilities {
            vision,
            ..Default::default()
        },
        calls: AtomicUsize::new(0),
    })
}

#[tokio::test]
async fn test_interpret_through_router() {
    let provider = canned(
        r#"[{"purpose": "open settings", "bounds": {"x": 1, "y": 1, "width": 9, "height": 9}}]"#,
        true,
    );
    let vision = RouterVision::new(router_with(provider.clone())).with_timeout(30);

    let interpretation = vision.interpret(b"png-bytes").await.unwrap();
    assert_eq!(interpretation.elements.len(), 1);
    assert_eq!(interpretation.provider.as_deref(), Some("canned"));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_interpret_malformed_output_is_empty_not_error() {
    let vision = RouterVision::new(router_with(canned("no idea", true)));
    let interpretation = vision.interpret(b"png").await.unwrap();
    assert!(interpretation.elements.is_empty());
}

#[tokio::test]
async fn test_interpret_without_image_provider_errors() {
    let vision = RouterVision::new(router_with(canned("[]", false)));
    let err = vision.interpret(b"png").await.unwrap_err();
    assert!(matches!(err, VisionError::Routing(_)));
}

#[tokio::test]
async fn test_interpret_candidates_filter() {
    let vision = RouterVision::new(router_with(canned("[]", true)))
        .with_candidates(vec!["someone-else".to_string()]);
    assert!(vision.interpret(b"png").await.is_err());
}

struct StalledProvider {
    capabilities: ProviderCapabilities,
    calls: AtomicUsize,
}

#[async_trait]
impl ModelProvider for StalledProvider {
    fn id(&self) -> &str {
        "stalled"
    }

    fn model(&self) -> &str {
        "stalled-vision"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
        _api_key: &str,
    ) -> Result<CompletionResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn test_stalled_provider_fails_over_inside_interpretation_window() {
    let stalled = Arc::new(StalledProvider {
        capabilities: ProviderCapabilities {
            vision: true,
            ..Default::default()
        },
        calls: AtomicUsize::new(0),
    });
    let backup = canned(
        r#"[{"purpose": "open menu", "bounds": {"x": 0, "y": 0, "width": 5, "height": 5}}]"#,
        true,
    );
    let router = Arc::new(
        ProviderRouter::new(RetryConfig::none())
            .with_route(ProviderRoute::new(
                stalled.clone(),
                Arc::new(KeyPool::new("stalled", ["ks"], 10)),
                Arc::new(CircuitBreaker::new("stalled", CircuitBreakerConfig::default())),
            ))
            .with_route(ProviderRoute::new(
                backup.clone(),
                Arc::new(KeyPool::new("canned", ["kc"], 10)),
                Arc::new(CircuitBreaker::new("canned", CircuitBreakerConfig::default())),
            )),
    );
    let vision = RouterVision::new(router.clone()).with_timeout(10);

    for _ in 0..4 {
        let interpretation = tokio::time::timeout(Duration::from_secs(90), vision.interpret(b"png"))
            .await
            .expect("interpretation window elapsed")
            .unwrap();
        assert_eq!(interpretation.provider.as_deref(), Some("canned"));
        assert_eq!(interpretation.elements.len(), 1);
    }

    assert_eq!(stalled.calls.load(Ordering::SeqCst), 3);
    assert_eq!(backup.calls.load(Ordering::SeqCst), 4);
    assert!(router.routes()[0].breaker().is_open());
    let stalled_keys = router.routes()[0].keys().snapshot();
    assert_eq!(stalled_keys[0].quota_used, 0);
    assert_eq!(stalled_keys[0].in_flight, 0);
}
