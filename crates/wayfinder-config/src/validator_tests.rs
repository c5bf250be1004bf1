use super::*;
use crate::schema::{ProviderConfig, ProviderKind};

fn gemini(keys: &[&str]) -> ProviderConfig {
    ProviderConfig {
        kind: ProviderKind::Gemini,
        api_keys: keys.iter().map(|k| k.to_string()).collect(),
        daily_limit: 100,
        model: None,
        base_url: None,
        vision: None,
    }
}

fn config_with_provider() -> Config {
    let mut config = Config::default();
    config.providers.insert("gemini".to_string(), gemini(&["k1"]));
    config
}

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "providers"));
}

#[test]
fn test_validate_zero_failure_threshold() {
    let mut config = config_with_provider();
    config.router.circuit.failure_threshold = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "router.circuit.failure_threshold"));
}

#[test]
fn test_validate_unknown_priority_provider() {
    let mut config = config_with_provider();
    config.router.priority = vec!["gemini".to_string(), "nope".to_string()];

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "router.priority" && e.message.contains("nope")));
}

#[test]
fn test_validate_provider_without_keys() {
    let mut config = Config::default();
    config.providers.insert("gemini".to_string(), gemini(&[]));

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "providers.gemini.api_keys"));
}

#[test]
fn test_validate_zero_daily_limit() {
    let mut config = Config::default();
    let mut provider = gemini(&["k1"]);
    provider.daily_limit = 0;
    config.providers.insert("gemini".to_string(), provider);

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "providers.gemini.daily_limit"));
}

#[test]
fn test_validate_bad_base_url() {
    let mut config = Config::default();
    let mut provider = gemini(&["k1"]);
    provider.base_url = Some("ftp://example.com".to_string());
    config.providers.insert("gemini".to_string(), provider);

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "providers.gemini.base_url"));
}

#[test]
fn test_validate_reset_hour_out_of_range() {
    let mut config = config_with_provider();
    config.key_pool.reset_hour_utc = 24;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "key_pool.reset_hour_utc"));
}

#[test]
fn test_validate_zero_budget_is_warning() {
    let mut config = config_with_provider();
    config.explorer.step_budget = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "explorer.step_budget"));
}

#[test]
fn test_validate_empty_denylist_is_warning() {
    let mut config = config_with_provider();
    config.policy.deny_keywords.clear();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "policy.deny_keywords"));
}

#[test]
fn test_validate_empty_priority_with_many_providers() {
    let mut config = config_with_provider();
    config.providers.insert("other".to_string(), gemini(&["k2"]));

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "router.priority"));
}

#[test]
fn test_validate_bad_browser_endpoint() {
    let mut config = config_with_provider();
    config.browser.endpoint = "localhost:9222".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "browser.endpoint"));
}

#[test]
fn test_validate_provider_timeout_must_undercut_vision_timeout() {
    let mut config = config_with_provider();
    config.explorer.provider_timeout_secs = config.explorer.vision_timeout_secs;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "explorer.provider_timeout_secs"));

    config.explorer.provider_timeout_secs = 0;
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
}

#[test]
fn test_validate_warns_when_retries_outlast_vision_timeout() {
    let mut config = config_with_provider();
    config.explorer.vision_timeout_secs = 60;
    config.explorer.provider_timeout_secs = 30;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "explorer.provider_timeout_secs"));
}

#[test]
fn test_default_timeouts_leave_room_for_failover() {
    let result = ConfigValidator::validate(&config_with_provider()).unwrap();
    assert!(result.is_valid());
    assert!(!result
        .warnings
        .iter()
        .any(|w| w.path == "explorer.provider_timeout_secs"));
}
