//! Builds providers, key pools and the router from configuration.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use wayfinder_config::{Config, ConfigLoader, ExplorerConfig, ProviderConfig, ProviderKind, SelectionKind};
use wayfinder_explorer::EngineConfig;
use wayfinder_protocols::ModelProvider;
use wayfinder_provider_gemini::GeminiProvider;
use wayfinder_provider_openai::OpenAIProvider;
use wayfinder_resilience::{
    CircuitBreaker, CircuitBreakerConfig, FileKeyPoolStore, HealthBased, KeyPool, KeyPoolStore,
    ProviderRoute, ProviderRouter, RetryConfig, RoundRobin, SelectionPolicy,
};

/// Credential state file named by `[key_pool] state_path`.
pub(crate) fn key_store(config: &Config) -> Arc<FileKeyPoolStore> {
    let path = ConfigLoader::expand_path(&config.key_pool.state_path.to_string_lossy());
    Arc::new(FileKeyPoolStore::new(path))
}

fn selection_policy(kind: SelectionKind) -> Box<dyn SelectionPolicy> {
    match kind {
        SelectionKind::Health => Box::new(HealthBased),
        SelectionKind::RoundRobin => Box::new(RoundRobin::default()),
    }
}

fn build_provider(id: &str, cfg: &ProviderConfig) -> Arc<dyn ModelProvider> {
    match cfg.kind {
        ProviderKind::Gemini => {
            let provider = match &cfg.base_url {
                Some(url) => GeminiProvider::with_url(cfg.model.clone(), url.clone()),
                None => GeminiProvider::new(cfg.model.clone()),
            };
            Arc::new(provider.with_id(id).with_vision(cfg.vision.unwrap_or(true)))
        }
        ProviderKind::OpenAi => {
            let provider = match &cfg.base_url {
                Some(url) => OpenAIProvider::with_url(id, cfg.model.clone(), url.clone()),
                None => OpenAIProvider::new(id, cfg.model.clone()),
            };
            Arc::new(provider.with_vision(cfg.vision.unwrap_or(true)))
        }
    }
}

/// Key pools for every configured provider, restored from `store`.
///
/// Pools come back in routing order. A provider with a store that cannot be
/// read starts from fresh counters.
pub(crate) async fn build_key_pools(
    config: &Config,
    store: &dyn KeyPoolStore,
) -> Vec<(String, Arc<KeyPool>)> {
    let mut pools = Vec::new();
    for id in config.provider_order() {
        let Some(cfg) = config.providers.get(&id) else {
            continue;
        };
        let pool = KeyPool::new(id.clone(), cfg.api_keys.iter().cloned(), cfg.daily_limit)
            .with_policy(selection_policy(config.key_pool.selection))
            .with_reset_hour(config.key_pool.reset_hour_utc);

        match store.load(&id).await {
            Ok(Some(records)) => {
                let matched = pool.restore(&records);
                debug!(provider = %id, matched, "Restored key pool state");
            }
            Ok(None) => {}
            Err(e) => warn!(provider = %id, "Failed to load key pool state: {}", e),
        }
        pools.push((id, Arc::new(pool)));
    }
    pools
}

pub(crate) fn retry_config(config: &Config) -> RetryConfig {
    let retry = &config.router.retry;
    RetryConfig {
        max_retries: retry.max_retries,
        base_delay: Duration::from_millis(retry.base_delay_ms),
        max_delay: Duration::from_millis(retry.max_delay_ms),
        backoff_multiplier: retry.backoff_multiplier,
        jitter: retry.jitter,
    }
}

/// The provider router over every configured provider, in priority order.
pub(crate) async fn build_router(config: &Config, store: Arc<FileKeyPoolStore>) -> ProviderRouter {
    let breaker_config = CircuitBreakerConfig {
        failure_threshold: config.router.circuit.failure_threshold,
        cooldown: Duration::from_secs(config.router.circuit.cooldown_secs),
    };

    let mut router = ProviderRouter::new(retry_config(config));
    for (id, keys) in build_key_pools(config, store.as_ref()).await {
        let Some(cfg) = config.providers.get(&id) else {
            continue;
        };
        let provider = build_provider(&id, cfg);
        let breaker = Arc::new(CircuitBreaker::new(id.clone(), breaker_config));
        info!(
            provider = %id,
            credentials = keys.len(),
            vision = provider.capabilities().vision,
            "Registered provider"
        );
        router.add_route(ProviderRoute::new(provider, keys, breaker));
    }
    router.with_store(store)
}

pub(crate) fn engine_config(explorer: &ExplorerConfig) -> EngineConfig {
    EngineConfig {
        run_deadline: explorer.run_deadline_secs.map(Duration::from_secs),
        action_timeout: Duration::from_secs(explorer.action_timeout_secs),
        vision_timeout: Duration::from_secs(explorer.vision_timeout_secs),
        max_frontier: explorer.max_frontier,
        settle: Duration::from_millis(explorer.settle_ms),
    }
}

/// Credential status per provider, keyed by provider ID.
pub(crate) fn status_report(
    pools: &[(String, Arc<KeyPool>)],
) -> BTreeMap<String, Vec<wayfinder_resilience::CredentialStatus>> {
    pools
        .iter()
        .map(|(id, pool)| (id.clone(), pool.status()))
        .collect()
}
