//! Run results.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use wayfinder_protocols::ManualStep;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    #[default]
    FrontierExhausted,
    BudgetExhausted,
    DeadlineReached,
}

/// Counters for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub states_visited: u32,
    pub elements_discovered: u32,
    pub elements_denied: u32,
    pub tasks_enqueued: u32,
    /// Tasks rejected at enqueue time because an identical one was queued.
    pub tasks_deduplicated: u32,
    /// States reached again and skipped without interpretation.
    pub duplicates_skipped: u32,
    /// Tasks dropped because the frontier was full.
    pub frontier_overflow: u32,
    pub action_failures: u32,
    /// Screenshot or vision failures; the step is still recorded.
    pub interpretation_failures: u32,
    pub providers_used: BTreeSet<String>,
    pub stop_reason: StopReason,
    pub elapsed_ms: u64,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorationReport {
    pub seed_url: String,
    pub steps: Vec<ManualStep>,
    pub summary: RunSummary,
}
