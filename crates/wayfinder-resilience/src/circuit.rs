//! Per-provider circuit breaker.
//!
//! Closed until `failure_threshold` consecutive failures, then open. An open
//! breaker closes again (with a zeroed failure count) once more than
//! `cooldown` has elapsed since the last failure.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Circuit breaker configuration.
#[derive(Debug, Clone, Copy)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub cooldown: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            cooldown: Duration::from_secs(60),
        }
    }
}

/// Observable breaker state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CircuitState {
    pub failure_count: u32,
    pub last_failure_at: Option<Instant>,
    pub is_open: bool,
}

/// Circuit breaker guarding a single provider.
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    state: Mutex<CircuitState>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: Mutex::new(CircuitState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> CircuitBreakerConfig {
        self.config
    }

    /// Whether a call may go through right now.
    pub fn allow_request(&self) -> bool {
        self.allow_request_at(Instant::now())
    }

    pub fn allow_request_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock();
        if !state.is_open {
            return true;
        }

        let cooled_down = state
            .last_failure_at
            .is_none_or(|at| now.saturating_duration_since(at) > self.config.cooldown);

        if cooled_down {
            state.is_open = false;
            state.failure_count = 0;
            info!(provider = %self.name, "Circuit closed after cooldown");
            true
        } else {
            false
        }
    }

    pub fn record_success(&self) {
        let mut state = self.state.lock();
        if state.failure_count > 0 {
            debug!(provider = %self.name, failures = state.failure_count, "Circuit failure count reset");
        }
        state.failure_count = 0;
        state.is_open = false;
    }

    pub fn record_failure(&self) {
        self.record_failure_at(Instant::now());
    }

    pub fn record_failure_at(&self, now: Instant) {
        let mut state = self.state.lock();
        state.failure_count = state.failure_count.saturating_add(1);
        state.last_failure_at = Some(now);

        if !state.is_open && state.failure_count >= self.config.failure_threshold {
            state.is_open = true;
            warn!(
                provider = %self.name,
                failures = state.failure_count,
                cooldown_secs = self.config.cooldown.as_secs(),
                "Circuit opened"
            );
        }
    }

    pub fn state(&self) -> CircuitState {
        *self.state.lock()
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().is_open
    }
}

#[cfg(test)]
#[path = "circuit_tests.rs"]
mod tests;
