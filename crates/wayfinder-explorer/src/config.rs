//! Engine tuning knobs.

use std::time::Duration;

/// Per-run limits and delays.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wall-clock limit for the whole run.
    pub run_deadline: Option<Duration>,
    /// Limit for one browser action (navigate, click).
    pub action_timeout: Duration,
    /// Limit for one screenshot interpretation.
    pub vision_timeout: Duration,
    /// Maximum pending tasks; 0 means unlimited.
    pub max_frontier: usize,
    /// Pause after an action before reading page state.
    pub settle: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            run_deadline: None,
            action_timeout: Duration::from_secs(30),
            vision_timeout: Duration::from_secs(90),
            max_frontier: 500,
            settle: Duration::from_millis(500),
        }
    }
}
