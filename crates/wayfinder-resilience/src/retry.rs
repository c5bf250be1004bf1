//! Backoff policy for transient provider errors.

use std::time::Duration;

use rand::Rng;
use wayfinder_protocols::ProviderError;

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt, per credential.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Spread delays by up to 10% either way.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Calculate delay for a given attempt (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.base_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        let delay = delay.min(self.max_delay.as_millis() as f64);

        let delay_ms = if self.jitter {
            let jitter = rand_jitter(delay * 0.1);
            (delay + jitter).max(0.0) as u64
        } else {
            delay as u64
        };

        Duration::from_millis(delay_ms)
    }

    /// Whether `error` on retry number `retries` should be retried.
    pub fn should_retry(&self, error: &ProviderError, retries: u32) -> bool {
        error.is_retryable() && retries < self.max_retries
    }
}

/// Uniform jitter in `[-max, max]`.
fn rand_jitter(max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    rand::thread_rng().gen_range(-max..=max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(1000),
            backoff_multiplier: 2.0,
            jitter: false,
        }
    }

    #[test]
    fn test_exponential_delays() {
        let config = fixed();
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_capped() {
        let config = fixed();
        assert_eq!(config.delay_for_attempt(10), Duration::from_millis(1000));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let config = RetryConfig {
            jitter: true,
            ..fixed()
        };
        let delays: Vec<u128> = (0..200)
            .map(|_| config.delay_for_attempt(1).as_millis())
            .collect();
        assert!(delays.iter().all(|d| (180..=220).contains(d)));
        assert!(delays.iter().any(|&d| d < 200));
        assert!(delays.iter().any(|&d| d > 200));
    }

    #[test]
    fn test_jitter_on_zero_delay_is_zero() {
        let config = RetryConfig {
            base_delay: Duration::ZERO,
            jitter: true,
            ..fixed()
        };
        assert_eq!(config.delay_for_attempt(2), Duration::ZERO);
    }

    #[test]
    fn test_should_retry_only_transient_within_budget() {
        let config = fixed();
        assert!(config.should_retry(&ProviderError::Timeout(5), 0));
        assert!(!config.should_retry(&ProviderError::Timeout(5), 3));
        assert!(!config.should_retry(
            &ProviderError::QuotaExceeded("quota".to_string()),
            0
        ));
        assert!(!RetryConfig::none().should_retry(&ProviderError::Network("x".into()), 0));
    }
}
