//! Model provider errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not found: {0}")]
    NotFound(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited: retry after {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

impl ProviderError {
    /// Classify an HTTP error response from a provider API.
    pub fn from_api_response(status: u16, message: String) -> Self {
        let lower = message.to_lowercase();

        if status == 401 || status == 403 || lower.contains("api key not valid") {
            return ProviderError::AuthenticationFailed(message);
        }

        if lower.contains("quota")
            || lower.contains("resource_exhausted")
            || lower.contains("resource has been exhausted")
        {
            return ProviderError::QuotaExceeded(message);
        }

        if status == 429 {
            return ProviderError::RateLimited {
                retry_after_seconds: 0,
            };
        }

        ProviderError::ApiError { status, message }
    }

    /// Whether the error means the credential used has run out of quota.
    pub fn is_quota_error(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited { .. }
                | ProviderError::QuotaExceeded(_)
                | ProviderError::ApiError { status: 429, .. }
        )
    }

    /// Whether the error means the credential used was rejected outright.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_)
                | ProviderError::ApiError {
                    status: 401 | 403,
                    ..
                }
        )
    }

    /// Whether the same call may succeed if repeated with the same credential.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Network(_) | ProviderError::Timeout(_) => true,
            ProviderError::ApiError { status, .. } => matches!(status, 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
