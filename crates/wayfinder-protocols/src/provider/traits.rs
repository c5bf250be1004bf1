//! Model provider trait definition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{CompletionRequest, CompletionResponse};
use crate::error::ProviderError;

/// Provider capabilities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// Supports image inputs.
    pub vision: bool,

    /// Supports a JSON-only response mode.
    pub json_mode: bool,

    /// Maximum concurrent requests.
    pub max_concurrent: Option<u32>,
}

/// Core trait for generative model providers.
///
/// Providers are stateless with respect to credentials: the caller picks an
/// API key for every call, so quota accounting stays outside the provider.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &str;

    /// Returns the model used for completions.
    fn model(&self) -> &str;

    /// Returns the provider capabilities.
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Generate a completion using the given API key.
    async fn complete(
        &self,
        request: CompletionRequest,
        api_key: &str,
    ) -> Result<CompletionResponse, ProviderError>;
}
