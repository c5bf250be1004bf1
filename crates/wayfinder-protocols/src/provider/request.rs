//! Completion request types.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Inline image attached to a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInput {
    /// MIME type, e.g. `image/png`.
    pub media_type: String,

    /// Base64-encoded image bytes.
    pub data: String,
}

impl ImageInput {
    /// Encode raw PNG bytes.
    pub fn png(bytes: &[u8]) -> Self {
        Self {
            media_type: "image/png".to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Encode raw JPEG bytes.
    pub fn jpeg(bytes: &[u8]) -> Self {
        Self {
            media_type: "image/jpeg".to_string(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Render as a `data:` URI.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Request for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// User prompt.
    pub prompt: String,

    /// System instruction (if supported separately).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Optional image payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInput>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for sampling (0.0 - 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl CompletionRequest {
    /// Create a new completion request.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            image: None,
            max_tokens: None,
            temperature: None,
            timeout_seconds: None,
        }
    }

    /// Set the system message.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Attach an image.
    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Whether the request carries an image payload.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
