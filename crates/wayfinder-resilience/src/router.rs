//! Priority-ordered provider routing.
//!
//! Providers are tried one after another in configured order. Each provider
//! call runs a bounded loop over its key pool: quota errors rotate to the
//! next credential, authorization errors disable the credential and rotate,
//! transient errors back off and retry, anything else fails the provider.
//! A request's `timeout_seconds` bounds every single attempt, so a provider
//! that hangs counts as a transient failure instead of stalling the caller.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use wayfinder_protocols::{
    CompletionRequest, CompletionResponse, ModelProvider, ProviderError, ProviderFailure,
    RouterError,
};

use crate::circuit::CircuitBreaker;
use crate::key_pool::{KeyPool, KeyPoolStore};
use crate::retry::RetryConfig;

/// One routable provider with its credentials and breaker.
#[derive(Clone)]
pub struct ProviderRoute {
    provider: Arc<dyn ModelProvider>,
    keys: Arc<KeyPool>,
    breaker: Arc<CircuitBreaker>,
}

impl ProviderRoute {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        keys: Arc<KeyPool>,
        breaker: Arc<CircuitBreaker>,
    ) -> Self {
        Self {
            provider,
            keys,
            breaker,
        }
    }

    pub fn id(&self) -> &str {
        self.provider.id()
    }

    pub fn accepts_images(&self) -> bool {
        self.provider.capabilities().vision
    }

    pub fn keys(&self) -> &Arc<KeyPool> {
        &self.keys
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }
}

/// A credential reservation taken by `KeyPool::acquire`.
///
/// Dropping an unsettled lease releases the reservation, which covers
/// retries, fatal errors and a caller abandoning the call mid-flight.
struct Lease<'a> {
    keys: &'a KeyPool,
    id: String,
    settled: bool,
}

impl<'a> Lease<'a> {
    fn new(keys: &'a KeyPool, id: String) -> Self {
        Self {
            keys,
            id,
            settled: false,
        }
    }

    fn settle(mut self, record: impl FnOnce(&KeyPool, &str)) {
        record(self.keys, &self.id);
        self.settled = true;
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.keys.release(&self.id);
        }
    }
}

/// A successful routed call.
#[derive(Debug, Clone)]
pub struct RoutedResponse {
    pub provider_id: String,
    pub response: CompletionResponse,
}

/// Routes requests across providers with failover.
pub struct ProviderRouter {
    routes: Vec<ProviderRoute>,
    retry: RetryConfig,
    store: Option<Arc<dyn KeyPoolStore>>,
    /// Held across snapshot and save so persisted state never goes backwards.
    persist_lock: Mutex<()>,
}

impl ProviderRouter {
    pub fn new(retry: RetryConfig) -> Self {
        Self {
            routes: Vec::new(),
            retry,
            store: None,
            persist_lock: Mutex::new(()),
        }
    }

    /// Append a route; earlier routes have higher priority.
    pub fn with_route(mut self, route: ProviderRoute) -> Self {
        self.add_route(route);
        self
    }

    pub fn add_route(&mut self, route: ProviderRoute) {
        if self.routes.iter().any(|r| r.id() == route.id()) {
            warn!(provider = %route.id(), "Duplicate provider route ignored");
            return;
        }
        self.routes.push(route);
    }

    /// Persist key pool state after every call outcome.
    pub fn with_store(mut self, store: Arc<dyn KeyPoolStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn routes(&self) -> &[ProviderRoute] {
        &self.routes
    }

    pub fn provider_ids(&self) -> Vec<&str> {
        self.routes.iter().map(ProviderRoute::id).collect()
    }

    /// Route across every configured provider.
    pub async fn route(&self, request: &CompletionRequest) -> Result<RoutedResponse, RouterError> {
        let eligible: Vec<&ProviderRoute> = self.routes.iter().collect();
        self.route_through(request, eligible).await
    }

    /// Route across the named providers only, still in priority order.
    pub async fn route_among(
        &self,
        request: &CompletionRequest,
        candidates: &[&str],
    ) -> Result<RoutedResponse, RouterError> {
        let eligible: Vec<&ProviderRoute> = self
            .routes
            .iter()
            .filter(|r| candidates.contains(&r.id()))
            .collect();
        self.route_through(request, eligible).await
    }

    async fn route_through(
        &self,
        request: &CompletionRequest,
        routes: Vec<&ProviderRoute>,
    ) -> Result<RoutedResponse, RouterError> {
        let image = request.has_image();
        let eligible: Vec<&ProviderRoute> = routes
            .into_iter()
            .filter(|r| !image || r.accepts_images())
            .collect();

        if eligible.is_empty() {
            warn!(image, "No eligible provider for request");
            return Err(RouterError::NoEligibleProviders { image });
        }

        let mut failures = Vec::with_capacity(eligible.len());

        for route in eligible {
            if !route.breaker.allow_request() {
                debug!(provider = %route.id(), "Circuit open, skipping provider");
                failures.push(ProviderFailure::new(route.id(), "circuit open"));
                continue;
            }

            match self.call_provider(route, request).await {
                Ok(response) => {
                    route.breaker.record_success();
                    debug!(provider = %route.id(), model = %response.model, "Provider call succeeded");
                    return Ok(RoutedResponse {
                        provider_id: route.id().to_string(),
                        response,
                    });
                }
                Err(reason) => {
                    route.breaker.record_failure();
                    warn!(provider = %route.id(), %reason, "Provider call failed, trying next");
                    failures.push(ProviderFailure::new(route.id(), reason));
                }
            }
        }

        info!(count = failures.len(), "All providers failed");
        Err(RouterError::AllProvidersFailed { failures })
    }

    /// One provider call: rotate credentials and retry transient errors.
    async fn call_provider(
        &self,
        route: &ProviderRoute,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, String> {
        let max_rotations = route.keys.len();
        let mut rotations = 0usize;
        let mut retries = 0u32;
        let mut last_error: Option<String> = None;

        loop {
            let Some(credential) = route.keys.acquire() else {
                return Err(match last_error {
                    Some(e) => format!("no usable credential (last error: {})", e),
                    None => "no usable credential".to_string(),
                });
            };

            let lease = Lease::new(&route.keys, credential.id.clone());

            debug!(
                provider = %route.id(),
                credential = %credential.id,
                retries,
                rotations,
                "Calling provider"
            );

            match self.attempt(route, request, credential.secret()).await {
                Ok(response) => {
                    lease.settle(|keys, id| keys.record_success(id));
                    self.persist(route).await;
                    return Ok(response);
                }
                Err(e) if e.is_auth_error() => {
                    let reason = e.to_string();
                    lease.settle(|keys, id| keys.record_auth_failure(id, &reason));
                    self.persist(route).await;
                    last_error = Some(reason);
                    rotations += 1;
                    retries = 0;
                }
                Err(e) if e.is_quota_error() => {
                    let reason = e.to_string();
                    lease.settle(|keys, id| keys.record_quota_exhausted(id, &reason));
                    self.persist(route).await;
                    last_error = Some(reason);
                    rotations += 1;
                    retries = 0;
                }
                Err(e) if self.retry.should_retry(&e, retries) => {
                    drop(lease);
                    let delay = self.retry.delay_for_attempt(retries);
                    retries += 1;
                    warn!(
                        provider = %route.id(),
                        credential = %credential.id,
                        attempt = retries,
                        max_retries = self.retry.max_retries,
                        error = %e,
                        "Transient provider error, retrying in {:?}",
                        delay
                    );
                    sleep(delay).await;
                    continue;
                }
                Err(e) => {
                    warn!(provider = %route.id(), credential = %credential.id, error = %e, "Provider error");
                    return Err(e.to_string());
                }
            }

            if rotations >= max_rotations {
                return Err(format!(
                    "all {} credentials rejected (last error: {})",
                    max_rotations,
                    last_error.unwrap_or_default()
                ));
            }
        }
    }

    /// A single provider call, bounded by the request's own timeout.
    async fn attempt(
        &self,
        route: &ProviderRoute,
        request: &CompletionRequest,
        secret: &str,
    ) -> Result<CompletionResponse, ProviderError> {
        let call = route.provider.complete(request.clone(), secret);
        match request.timeout_seconds {
            Some(seconds) => match timeout(Duration::from_secs(seconds), call).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(provider = %route.id(), seconds, "Provider call timed out");
                    Err(ProviderError::Timeout(seconds))
                }
            },
            None => call.await,
        }
    }

    async fn persist(&self, route: &ProviderRoute) {
        let Some(store) = &self.store else {
            return;
        };
        let _guard = self.persist_lock.lock().await;
        if let Err(e) = store.save(route.id(), &route.keys.snapshot()).await {
            warn!(provider = %route.id(), error = %e, "Failed to persist key pool state");
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
