//! Append-only record of discovered states.

use std::collections::HashSet;

use chrono::Utc;
use thiserror::Error;
use wayfinder_protocols::{ArtifactRef, CandidateElement, ManualStep};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Fingerprint already recorded: {0}")]
    DuplicateFingerprint(String),
}

/// Collects one [`ManualStep`] per distinct state, in discovery order.
#[derive(Debug, Default)]
pub struct ManualStepRecorder {
    steps: Vec<ManualStep>,
    fingerprints: HashSet<String>,
}

impl ManualStepRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step; `step_index` is assigned here.
    pub fn record(
        &mut self,
        url: impl Into<String>,
        action_description: impl Into<String>,
        artifact_ref: Option<ArtifactRef>,
        elements: Vec<CandidateElement>,
        fingerprint: impl Into<String>,
    ) -> Result<&ManualStep, RecordError> {
        let fingerprint = fingerprint.into();
        if !self.fingerprints.insert(fingerprint.clone()) {
            return Err(RecordError::DuplicateFingerprint(fingerprint));
        }

        let step_index = self.steps.len() as u32;
        self.steps.push(ManualStep {
            step_index,
            url: url.into(),
            action_description: action_description.into(),
            artifact_ref,
            elements,
            fingerprint,
            recorded_at: Utc::now(),
        });
        Ok(&self.steps[self.steps.len() - 1])
    }

    pub fn steps(&self) -> &[ManualStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<ManualStep> {
        self.steps
    }
}
