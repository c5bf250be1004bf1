//! Configuration loader.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a file, or defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::InvalidValue {
            field: "env pattern".to_string(),
            message: e.to_string(),
        })?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.wayfinder`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ProviderKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.explorer.step_budget, 50);
        assert_eq!(config.router.circuit.failure_threshold, 3);
        assert_eq!(config.router.circuit.cooldown_secs, 60);
    }

    #[test]
    fn test_load_explorer_section() {
        let content = r#"
            [explorer]
            step_budget = 12
            run_deadline_secs = 600
            max_frontier = 40
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.explorer.step_budget, 12);
        assert_eq!(config.explorer.run_deadline_secs, Some(600));
        assert_eq!(config.explorer.max_frontier, 40);
    }

    #[test]
    fn test_load_with_providers() {
        let content = r#"
            [router]
            priority = ["groq", "gemini"]

            [providers.gemini]
            kind = "gemini"
            api_keys = ["key-a", "key-b"]
            daily_limit = 1500

            [providers.groq]
            kind = "openai"
            api_keys = ["gsk-1"]
            base_url = "https://api.groq.com/openai/v1/chat/completions"
            model = "llama-3.2-90b-vision-preview"
            vision = true
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.providers.len(), 2);
        let gemini = &config.providers["gemini"];
        assert_eq!(gemini.kind, ProviderKind::Gemini);
        assert_eq!(gemini.api_keys.len(), 2);
        assert_eq!(gemini.daily_limit, 1500);
        assert_eq!(config.providers["groq"].kind, ProviderKind::OpenAi);
        assert_eq!(config.provider_order(), vec!["groq", "gemini"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[explorer]").unwrap();
        writeln!(file, "step_budget = 7").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.explorer.step_budget, 7);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/wayfinder.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            ConfigLoader::load_or_default(Path::new("/nonexistent/path/wayfinder.toml")).unwrap();
        assert_eq!(config.explorer.step_budget, 50);
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("WAYFINDER_TEST_KEY", "secret-value");
        }
        let content = "value = \"${WAYFINDER_TEST_KEY}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert!(expanded.contains("secret-value"));
        unsafe {
            std::env::remove_var("WAYFINDER_TEST_KEY");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_WAYFINDER_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/test");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/test"));
    }
}
