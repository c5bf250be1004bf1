//! # Wayfinder Resilience
//!
//! Keeps model calls flowing when individual providers or credentials fail:
//! per-provider circuit breakers, daily-quota key pools with persisted state,
//! bounded retry, and a priority router tying them together.

pub mod circuit;
pub mod error;
pub mod key_pool;
pub mod retry;
pub mod router;

pub use circuit::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use error::KeyStoreError;
pub use key_pool::{
    Credential, CredentialHealth, CredentialStatus, FileKeyPoolStore, HealthBased, KeyPool,
    KeyPoolStore, MemoryKeyPoolStore, RoundRobin, SelectionPolicy,
};
pub use retry::RetryConfig;
pub use router::{ProviderRoute, ProviderRouter, RoutedResponse};
