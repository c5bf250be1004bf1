//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub explorer: ExplorerConfig,

    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub key_pool: KeyPoolConfig,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Provider IDs in routing order: the configured priority list first,
    /// then any remaining providers sorted by ID.
    pub fn provider_order(&self) -> Vec<String> {
        let mut order: Vec<String> = self
            .router
            .priority
            .iter()
            .filter(|id| self.providers.contains_key(*id))
            .cloned()
            .collect();

        let mut rest: Vec<String> = self
            .providers
            .keys()
            .filter(|id| !order.contains(id))
            .cloned()
            .collect();
        rest.sort();
        order.extend(rest);
        order
    }
}

/// Exploration engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Maximum number of distinct page states to process.
    #[serde(default = "default_step_budget")]
    pub step_budget: u32,

    /// Wall-clock limit for a whole run.
    #[serde(default)]
    pub run_deadline_secs: Option<u64>,

    #[serde(default = "default_action_timeout")]
    pub action_timeout_secs: u64,

    /// Upper bound on interpreting one screenshot, across every provider.
    #[serde(default = "default_vision_timeout")]
    pub vision_timeout_secs: u64,

    /// Upper bound on a single provider attempt. Must stay below
    /// `vision_timeout_secs` so a hanging provider fails over in time.
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,

    /// Maximum pending tasks (0 = unlimited).
    #[serde(default = "default_max_frontier")]
    pub max_frontier: usize,

    /// Pause after each action before reading page state.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            step_budget: default_step_budget(),
            run_deadline_secs: None,
            action_timeout_secs: default_action_timeout(),
            vision_timeout_secs: default_vision_timeout(),
            provider_timeout_secs: default_provider_timeout(),
            max_frontier: default_max_frontier(),
            settle_ms: default_settle_ms(),
        }
    }
}

fn default_step_budget() -> u32 {
    50
}

fn default_action_timeout() -> u64 {
    30
}

fn default_vision_timeout() -> u64 {
    90
}

fn default_provider_timeout() -> u64 {
    25
}

fn default_max_frontier() -> usize {
    500
}

fn default_settle_ms() -> u64 {
    500
}

/// Click policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Elements whose purpose or text contains any of these (case-insensitive)
    /// are never clicked.
    #[serde(default = "default_deny_keywords")]
    pub deny_keywords: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            deny_keywords: default_deny_keywords(),
        }
    }
}

pub fn default_deny_keywords() -> Vec<String> {
    [
        "logout",
        "log out",
        "log-out",
        "sign out",
        "signout",
        "sign-out",
        "search",
        "text field",
        "text input",
        "input field",
        "textarea",
        "delete account",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Provider routing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Provider IDs, fast/cheap first.
    #[serde(default)]
    pub priority: Vec<String>,

    #[serde(default)]
    pub circuit: CircuitConfig,

    #[serde(default)]
    pub retry: RetrySettings,
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitConfig {
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,

    #[serde(default = "default_cooldown")]
    pub cooldown_secs: u64,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            cooldown_secs: default_cooldown(),
        }
    }
}

fn default_failure_threshold() -> u32 {
    3
}

fn default_cooldown() -> u64 {
    60
}

/// Retry settings for transient provider errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay(),
            max_delay_ms: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: default_jitter(),
        }
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay() -> u64 {
    500
}

fn default_max_delay() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_jitter() -> bool {
    true
}

/// Credential selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    #[default]
    Health,
    RoundRobin,
}

/// Key pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPoolConfig {
    /// Where credential usage is persisted across restarts.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Hour of day (UTC) at which daily quotas reset.
    #[serde(default)]
    pub reset_hour_utc: u32,

    #[serde(default)]
    pub selection: SelectionKind,
}

impl Default for KeyPoolConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            reset_hour_utc: 0,
            selection: SelectionKind::default(),
        }
    }
}

fn default_state_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".wayfinder")
        .join("key_pool.json")
}

/// Provider API flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

/// Provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,

    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Requests allowed per credential per day.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Override the provider's declared image support.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vision: Option<bool>,
}

fn default_daily_limit() -> u32 {
    1000
}

/// Browser connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome remote debugging endpoint.
    #[serde(default = "default_browser_endpoint")]
    pub endpoint: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: default_browser_endpoint(),
        }
    }
}

fn default_browser_endpoint() -> String {
    "http://localhost:9222".to_string()
}

/// Artifact storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_artifacts_dir")]
    pub dir: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
        }
    }
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
