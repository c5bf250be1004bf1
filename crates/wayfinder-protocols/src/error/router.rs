//! Provider routing errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why one provider could not serve a routed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub reason: String,
}

impl ProviderFailure {
    pub fn new(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("No eligible provider for request (image payload: {image})")]
    NoEligibleProviders { image: bool },

    #[error("All providers failed: {}", format_failures(.failures))]
    AllProvidersFailed { failures: Vec<ProviderFailure> },
}

impl RouterError {
    /// Per-provider failure reasons, empty when nothing was eligible.
    pub fn failures(&self) -> &[ProviderFailure] {
        match self {
            RouterError::AllProvidersFailed { failures } => failures,
            RouterError::NoEligibleProviders { .. } => &[],
        }
    }
}

fn format_failures(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
