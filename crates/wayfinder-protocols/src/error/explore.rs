//! Exploration errors.

use thiserror::Error;

use super::{BrowserError, RouterError};

/// Failure of a single screenshot interpretation.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Routing failed: {0}")]
    Routing(#[from] RouterError),

    #[error("Interpretation timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors that abort an exploration run.
///
/// Everything below seed navigation is absorbed by the engine and shows up
/// only in the run summary.
#[derive(Debug, Error)]
pub enum ExploreError {
    #[error("Seed navigation to {url} failed: {source}")]
    SeedNavigation {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),
}
