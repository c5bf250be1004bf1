//! Router-backed screenshot interpretation.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use wayfinder_protocols::{
    Bounds, CandidateElement, CompletionRequest, ImageInput, Interpretation, VisionError,
    VisionInterpreter,
};
use wayfinder_resilience::ProviderRouter;

const SYSTEM_PROMPT: &str = "You are a UI analysis assistant. You look at screenshots of web \
applications and list the interactive elements a user could click.";

const ELEMENT_PROMPT: &str = r#"List every clickable element visible in this screenshot
(buttons, links, tabs, menu items, toggles).

Respond with a JSON array only, no other text:
[{"purpose": "<what clicking does>", "text": "<visible label or null>",
  "bounds": {"x": <left px>, "y": <top px>, "width": <px>, "height": <px>}}]

If nothing is clickable, respond with []."#;

/// Interprets screenshots by routing them to an image-capable model.
pub struct RouterVision {
    router: Arc<ProviderRouter>,
    candidates: Option<Vec<String>>,
    max_tokens: u32,
    timeout_seconds: Option<u64>,
}

impl RouterVision {
    pub fn new(router: Arc<ProviderRouter>) -> Self {
        Self {
            router,
            candidates: None,
            max_tokens: 4096,
            timeout_seconds: None,
        }
    }

    /// Restrict interpretation to the named providers.
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Per-request timeout passed to providers.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    fn build_request(&self, screenshot: &[u8]) -> CompletionRequest {
        let mut request = CompletionRequest::new(ELEMENT_PROMPT)
            .with_system(SYSTEM_PROMPT)
            .with_image(ImageInput::png(screenshot))
            .with_max_tokens(self.max_tokens)
            .with_temperature(0.0);
        if let Some(seconds) = self.timeout_seconds {
            request = request.with_timeout(seconds);
        }
        request
    }
}

#[async_trait]
impl VisionInterpreter for RouterVision {
    async fn interpret(&self, screenshot: &[u8]) -> Result<Interpretation, VisionError> {
        let request = self.build_request(screenshot);

        let routed = match &self.candidates {
            Some(ids) => {
                let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                self.router.route_among(&request, &ids).await?
            }
            None => self.router.route(&request).await?,
        };

        let elements = parse_elements(&routed.response.text);
        debug!(
            provider = %routed.provider_id,
            elements = elements.len(),
            "Screenshot interpreted"
        );

        Ok(Interpretation {
            elements,
            provider: Some(routed.provider_id),
        })
    }
}

/// Parse a model answer into candidate elements.
///
/// Accepts a bare JSON array, an `{"elements": [...]}` object, either one
/// wrapped in a fenced code block or surrounded by prose. Items missing a
/// purpose or a usable bounding box are dropped. Anything unparseable yields
/// an empty list.
pub fn parse_elements(response: &str) -> Vec<CandidateElement> {
    let body = strip_code_fence(response);

    let Some(items) = json_items(body) else {
        if !body.trim().is_empty() {
            warn!("Vision output was not a JSON element list");
        }
        return Vec::new();
    };

    items.iter().filter_map(element_from_value).collect()
}

fn strip_code_fence(response: &str) -> &str {
    let Ok(re) = Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```") else {
        return response;
    };
    re.captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(response)
}

fn json_items(body: &str) -> Option<Vec<Value>> {
    let trimmed = body.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(items) = items_of(value) {
            return Some(items);
        }
    }

    let start = trimmed.find(['[', '{'])?;
    let end = trimmed.rfind([']', '}'])?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&trimmed[start..=end])
        .ok()
        .and_then(items_of)
}

fn items_of(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("elements") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

fn element_from_value(value: &Value) -> Option<CandidateElement> {
    let purpose = ["purpose", "description", "label"]
        .iter()
        .find_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|p| !p.is_empty())?;

    let text = value
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("null"));

    let bounds = bounds_from_value(value.get("bounds").unwrap_or(value))?;
    if bounds.is_empty() {
        return None;
    }

    let element = CandidateElement::new(purpose, bounds);
    Some(match text {
        Some(t) => element.with_text(t),
        None => element,
    })
}

fn bounds_from_value(value: &Value) -> Option<Bounds> {
    if let Some(arr) = value.as_array() {
        let nums: Vec<f64> = arr.iter().filter_map(Value::as_f64).collect();
        if let &[x, y, width, height] = nums.as_slice() {
            return Some(Bounds::new(x, y, width, height));
        }
        return None;
    }

    let num = |k: &str| value.get(k).and_then(Value::as_f64);
    Some(Bounds::new(num("x")?, num("y")?, num("width")?, num("height")?))
}

#[cfg(test)]
#[path = "vision_tests.rs"]
mod tests;
