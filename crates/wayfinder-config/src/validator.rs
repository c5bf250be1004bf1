//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_explorer(config, &mut result);
        Self::validate_policy(config, &mut result);
        Self::validate_router(config, &mut result);
        Self::validate_key_pool(config, &mut result);
        Self::validate_providers(config, &mut result);
        Self::validate_browser(config, &mut result);

        Ok(result)
    }

    fn validate_explorer(config: &Config, result: &mut ValidationResult) {
        let explorer = &config.explorer;

        if explorer.step_budget == 0 {
            result.add_warning(ValidationWarning::new(
                "explorer.step_budget",
                "step_budget is 0, runs will record nothing",
            ));
        }

        if explorer.action_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "explorer.action_timeout_secs",
                "action_timeout_secs must be greater than 0",
            ));
        }

        if explorer.vision_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "explorer.vision_timeout_secs",
                "vision_timeout_secs must be greater than 0",
            ));
        }

        if explorer.provider_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "explorer.provider_timeout_secs",
                "provider_timeout_secs must be greater than 0",
            ));
        } else if explorer.provider_timeout_secs >= explorer.vision_timeout_secs {
            result.add_error(ValidationError::new(
                "explorer.provider_timeout_secs",
                "provider_timeout_secs must be less than vision_timeout_secs, \
                 or a hanging provider is never failed over",
            ));
        } else {
            let attempts = u64::from(config.router.retry.max_retries).saturating_add(1);
            let worst_case = explorer.provider_timeout_secs.saturating_mul(attempts);
            if worst_case >= explorer.vision_timeout_secs {
                result.add_warning(ValidationWarning::new(
                    "explorer.provider_timeout_secs",
                    format!(
                        "{} attempts of {}s can use up vision_timeout_secs ({}s) \
                         before the next provider is tried",
                        attempts, explorer.provider_timeout_secs, explorer.vision_timeout_secs
                    ),
                ));
            }
        }

        if explorer.run_deadline_secs == Some(0) {
            result.add_error(ValidationError::new(
                "explorer.run_deadline_secs",
                "run_deadline_secs must be greater than 0 when set",
            ));
        }
    }

    fn validate_policy(config: &Config, result: &mut ValidationResult) {
        if config.policy.deny_keywords.is_empty() {
            result.add_warning(ValidationWarning::new(
                "policy.deny_keywords",
                "Denylist is empty, logout and search controls will be clicked",
            ));
        }

        if config.policy.deny_keywords.iter().any(|k| k.trim().is_empty()) {
            result.add_error(ValidationError::new(
                "policy.deny_keywords",
                "Deny keywords cannot be blank",
            ));
        }
    }

    fn validate_router(config: &Config, result: &mut ValidationResult) {
        let router = &config.router;

        if router.circuit.failure_threshold == 0 {
            result.add_error(ValidationError::new(
                "router.circuit.failure_threshold",
                "failure_threshold must be greater than 0",
            ));
        }

        for id in &router.priority {
            if !config.providers.contains_key(id) {
                result.add_error(ValidationError::new(
                    "router.priority",
                    format!("Unknown provider '{}' in priority list", id),
                ));
            }
        }

        if router.priority.is_empty() && config.providers.len() > 1 {
            result.add_warning(ValidationWarning::new(
                "router.priority",
                "Priority list is empty, providers will be tried in ID order",
            ));
        }

        if router.retry.backoff_multiplier < 1.0 {
            result.add_error(ValidationError::new(
                "router.retry.backoff_multiplier",
                "backoff_multiplier must be at least 1.0",
            ));
        }

        if router.retry.base_delay_ms > router.retry.max_delay_ms {
            result.add_warning(ValidationWarning::new(
                "router.retry.base_delay_ms",
                "base_delay_ms exceeds max_delay_ms, every retry waits max_delay_ms",
            ));
        }
    }

    fn validate_key_pool(config: &Config, result: &mut ValidationResult) {
        if config.key_pool.reset_hour_utc > 23 {
            result.add_error(ValidationError::new(
                "key_pool.reset_hour_utc",
                "reset_hour_utc must be between 0 and 23",
            ));
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        if config.providers.is_empty() {
            result.add_warning(ValidationWarning::new(
                "providers",
                "No providers configured, pages cannot be interpreted",
            ));
        }

        for (name, provider) in &config.providers {
            if provider.api_keys.is_empty() {
                result.add_error(ValidationError::new(
                    format!("providers.{}.api_keys", name),
                    "At least one API key is required",
                ));
            }

            if provider.daily_limit == 0 {
                result.add_error(ValidationError::new(
                    format!("providers.{}.daily_limit", name),
                    "daily_limit must be greater than 0",
                ));
            }

            if let Some(ref url) = provider.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        format!("providers.{}.base_url", name),
                        "base_url must start with http:// or https://",
                    ));
                }
            }

            if provider.vision == Some(false) {
                result.add_warning(ValidationWarning::new(
                    format!("providers.{}.vision", name),
                    "Provider is marked text-only and will never receive screenshots",
                ));
            }
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let endpoint = &config.browser.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            result.add_error(ValidationError::new(
                "browser.endpoint",
                "endpoint must start with http:// or https://",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
