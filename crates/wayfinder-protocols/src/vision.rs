//! Screenshot interpretation protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VisionError;
use crate::types::CandidateElement;

/// Result of interpreting one screenshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Interpretation {
    pub elements: Vec<CandidateElement>,

    /// Provider that answered, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Turns screenshots into candidate interactive elements.
///
/// Malformed model output yields an empty element list, not an error; an
/// error means no provider could answer at all.
#[async_trait]
pub trait VisionInterpreter: Send + Sync {
    async fn interpret(&self, screenshot: &[u8]) -> Result<Interpretation, VisionError>;
}
