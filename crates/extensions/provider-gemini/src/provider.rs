//! Gemini model provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use wayfinder_protocols::{
    CompletionRequest, CompletionResponse, ModelProvider, ProviderCapabilities, ProviderError,
    Usage,
};

use crate::client::{BASE_URL, GeminiClient};
use crate::types::*;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini provider.
pub struct GeminiProvider {
    id: String,
    model: String,
    client: GeminiClient,
    capabilities: ProviderCapabilities,
}

impl GeminiProvider {
    /// Create a provider for the public Gemini API.
    pub fn new(model: Option<String>) -> Self {
        Self::with_url(model, BASE_URL)
    }

    /// Create a provider talking to a custom endpoint.
    pub fn with_url(model: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            id: "gemini".to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: GeminiClient::new(base_url),
            capabilities: ProviderCapabilities {
                vision: true,
                json_mode: true,
                max_concurrent: Some(10),
            },
        }
    }

    /// Register under a different provider ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Text-only Gemini models must not be sent screenshots.
    pub fn with_vision(mut self, vision: bool) -> Self {
        self.capabilities.vision = vision;
        self
    }

    fn build_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let mut parts = vec![Part::Text {
            text: request.prompt.clone(),
        }];
        if let Some(image) = &request.image {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.media_type.clone(),
                    data: image.data.clone(),
                },
            });
        }

        let system_instruction = request.system.as_ref().map(|s| Content {
            role: None,
            parts: vec![Part::Text { text: s.clone() }],
        });

        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_mime_type: None,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            system_instruction,
            generation_config,
        }
    }

    fn convert_response(
        &self,
        response: GenerateContentResponse,
    ) -> Result<CompletionResponse, ProviderError> {
        let Some(text) = response.text() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(ProviderError::InvalidResponse(format!(
                "Gemini returned no content: {}",
                reason
            )));
        };

        let id = response
            .response_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let model = response.model_version.unwrap_or_else(|| self.model.clone());
        let mut completion = CompletionResponse::new(id, model, text);
        if let Some(usage) = response.usage_metadata {
            completion.usage = Usage {
                prompt_tokens: usage.prompt_token_count,
                completion_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            };
        }
        Ok(completion)
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(
        &self,
        request: CompletionRequest,
        api_key: &str,
    ) -> Result<CompletionResponse, ProviderError> {
        let api_request = self.build_request(&request);
        let timeout = request.timeout_seconds.map(Duration::from_secs);

        let response = self
            .client
            .generate_content(&self.model, api_key, &api_request, timeout)
            .await?;

        let completion = self.convert_response(response)?;
        debug!(
            provider = %self.id,
            model = %completion.model,
            tokens = completion.usage.total_tokens,
            "Gemini completion"
        );
        Ok(completion)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
