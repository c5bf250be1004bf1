//! Gemini API client.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use wayfinder_protocols::ProviderError;

use crate::types::*;

pub(crate) const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client. Keys are supplied per call and sent as a header,
/// never in the URL.
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .timeout(Duration::from_secs(300))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Generate content (non-streaming).
    pub async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
        timeout: Option<Duration>,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        debug!(model, "Gemini generate_content");

        let mut builder = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(request);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| network_error(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| network_error(e, timeout))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<GeminiError>(&body) {
                Ok(e) if !e.error.status.is_empty() => {
                    format!("{} ({})", e.error.message, e.error.status)
                }
                Ok(e) => e.error.message,
                Err(_) => body,
            };
            return Err(ProviderError::from_api_response(status.as_u16(), message));
        }

        serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

fn network_error(e: reqwest::Error, timeout: Option<Duration>) -> ProviderError {
    if e.is_timeout() {
        return ProviderError::Timeout(timeout.map(|t| t.as_secs()).unwrap_or(300));
    }
    ProviderError::Network(e.without_url().to_string())
}
