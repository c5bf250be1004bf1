//! Manual steps recorded during exploration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CandidateElement;
use crate::artifact::ArtifactRef;

/// One deduplicated unit of discovered application behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualStep {
    /// Position in discovery order, starting at 0.
    pub step_index: u32,

    /// URL of the state reached.
    pub url: String,

    /// What was done to reach this state.
    pub action_description: String,

    /// Screenshot of the state, when capture succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_ref: Option<ArtifactRef>,

    /// Elements discovered on this state.
    #[serde(default)]
    pub elements: Vec<CandidateElement>,

    /// Fingerprint of the page state.
    pub fingerprint: String,

    pub recorded_at: DateTime<Utc>,
}
