//! OpenAI-compatible provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use wayfinder_protocols::{
    CompletionRequest, CompletionResponse, ModelProvider, ProviderCapabilities, ProviderError,
};

use crate::api::{ApiRequest, ApiResponse};
use crate::converter::{convert_messages, parse_error, parse_response};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Chat completions provider.
pub struct OpenAIProvider {
    id: String,
    model: String,
    api_url: String,
    client: Client,
    capabilities: ProviderCapabilities,
}

impl OpenAIProvider {
    pub fn new(id: impl Into<String>, model: Option<String>) -> Self {
        Self::with_url(id, model, DEFAULT_API_URL)
    }

    /// Create provider with custom API URL (for OpenAI-compatible APIs).
    pub fn with_url(id: impl Into<String>, model: Option<String>, api_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_url: api_url.into(),
            client: Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            capabilities: ProviderCapabilities {
                vision: true,
                json_mode: true,
                max_concurrent: Some(100),
            },
        }
    }

    /// Declare whether the configured model accepts images.
    pub fn with_vision(mut self, vision: bool) -> Self {
        self.capabilities.vision = vision;
        self
    }

    fn build_request(&self, request: &CompletionRequest) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            messages: convert_messages(request, self.capabilities.vision),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    async fn send_request(
        &self,
        api_request: &ApiRequest,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> Result<ApiResponse, ProviderError> {
        let mut builder = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(api_request);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let timeout_secs = timeout.map(|t| t.as_secs()).unwrap_or(DEFAULT_TIMEOUT_SECS);
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(timeout_secs)
            } else {
                ProviderError::Network(e.without_url().to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(timeout_secs)
            } else {
                ProviderError::Network(e.without_url().to_string())
            }
        })?;

        if !(200..300).contains(&status) {
            return Err(parse_error(status, body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
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
        let api_response = self.send_request(&api_request, api_key, timeout).await?;
        let completion = parse_response(api_response, &self.model)?;
        debug!(
            provider = %self.id,
            model = %completion.model,
            tokens = completion.usage.total_tokens,
            "Chat completion"
        );
        Ok(completion)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
