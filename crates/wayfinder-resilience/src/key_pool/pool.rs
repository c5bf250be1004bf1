//! Key pool: selection and accounting over a provider's credentials.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::credential::next_reset_after;
use super::{Credential, HealthBased, SelectionPolicy};

/// Coarse credential health for status reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialHealth {
    Available,
    Exhausted,
    Disabled,
}

/// Secret-free view of one credential.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialStatus {
    pub id: String,
    pub health: CredentialHealth,
    pub quota_used: u32,
    pub daily_limit: u32,
    pub reset_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl From<&Credential> for CredentialStatus {
    fn from(c: &Credential) -> Self {
        let health = if c.permanently_disabled {
            CredentialHealth::Disabled
        } else if c.is_available() {
            CredentialHealth::Available
        } else {
            CredentialHealth::Exhausted
        };
        Self {
            id: c.id.clone(),
            health,
            quota_used: c.quota_used,
            daily_limit: c.daily_limit,
            reset_at: c.reset_at,
            last_used: c.last_used,
            last_error: c.last_error.clone(),
        }
    }
}

/// Credentials for one provider.
///
/// All reads and writes go through a single mutex, so a pool shared between
/// concurrent runs never loses an update.
pub struct KeyPool {
    provider_id: String,
    reset_hour_utc: u32,
    policy: Box<dyn SelectionPolicy>,
    credentials: Mutex<Vec<Credential>>,
}

impl KeyPool {
    /// Create a pool. Duplicate secrets are collapsed.
    pub fn new<I, S>(provider_id: impl Into<String>, secrets: I, daily_limit: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let reset_at = next_reset_after(Utc::now(), 0);
        let mut credentials: Vec<Credential> = Vec::new();
        for secret in secrets {
            let credential = Credential::new(secret, daily_limit, reset_at);
            if !credentials.iter().any(|c| c.id == credential.id) {
                credentials.push(credential);
            }
        }

        Self {
            provider_id: provider_id.into(),
            reset_hour_utc: 0,
            policy: Box::new(HealthBased),
            credentials: Mutex::new(credentials),
        }
    }

    pub fn with_policy(mut self, policy: Box<dyn SelectionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Set the UTC hour at which quotas reset.
    pub fn with_reset_hour(mut self, reset_hour_utc: u32) -> Self {
        self.reset_hour_utc = reset_hour_utc.min(23);
        let reset_at = next_reset_after(Utc::now(), self.reset_hour_utc);
        for credential in self.credentials.get_mut().iter_mut() {
            credential.reset_at = reset_at;
        }
        self
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn len(&self) -> usize {
        self.credentials.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.lock().is_empty()
    }

    /// Pick a usable credential and reserve one unit of its quota, or `None`
    /// when every one is spent, disabled or fully reserved.
    ///
    /// The reservation is settled by `record_success`, `record_quota_exhausted`
    /// or `record_auth_failure`, or given back with `release`.
    pub fn acquire(&self) -> Option<Credential> {
        self.acquire_at(Utc::now())
    }

    pub fn acquire_at(&self, now: DateTime<Utc>) -> Option<Credential> {
        let mut credentials = self.credentials.lock();
        self.apply_resets(&mut credentials, now);

        let available: Vec<usize> = credentials
            .iter()
            .enumerate()
            .filter(|(_, c)| c.has_capacity())
            .map(|(i, _)| i)
            .collect();
        if available.is_empty() {
            debug!(provider = %self.provider_id, "No usable credential");
            return None;
        }

        let candidates: Vec<&Credential> = available.iter().map(|&i| &credentials[i]).collect();
        let picked = self.policy.select(&candidates)?;
        let index = *available.get(picked)?;

        let credential = &mut credentials[index];
        credential.last_used = Some(now);
        credential.in_flight += 1;
        debug!(
            provider = %self.provider_id,
            credential = %credential.id,
            quota_used = credential.quota_used,
            in_flight = credential.in_flight,
            "Credential acquired"
        );
        Some(credential.clone())
    }

    /// Count one successful call against the credential's quota.
    pub fn record_success(&self, id: &str) {
        self.update(id, |c| {
            c.in_flight = c.in_flight.saturating_sub(1);
            c.quota_used = c.quota_used.saturating_add(1);
            c.last_error = None;
        });
    }

    /// Give back a reservation for a call that did not count against quota.
    pub fn release(&self, id: &str) {
        self.update(id, |c| c.in_flight = c.in_flight.saturating_sub(1));
    }

    /// Mark the credential spent until the next daily reset.
    pub fn record_quota_exhausted(&self, id: &str, reason: &str) {
        warn!(provider = %self.provider_id, credential = %id, reason, "Credential quota exhausted");
        self.update(id, |c| {
            c.in_flight = c.in_flight.saturating_sub(1);
            c.quota_used = c.daily_limit;
            c.is_active = false;
            c.last_error = Some(reason.to_string());
        });
    }

    /// Disable the credential for good.
    pub fn record_auth_failure(&self, id: &str, reason: &str) {
        warn!(provider = %self.provider_id, credential = %id, reason, "Credential rejected, disabling");
        self.update(id, |c| {
            c.in_flight = c.in_flight.saturating_sub(1);
            c.is_active = false;
            c.permanently_disabled = true;
            c.last_error = Some(reason.to_string());
        });
    }

    /// Clear all usage and re-enable every credential, including disabled ones.
    pub fn reset(&self) {
        let reset_at = next_reset_after(Utc::now(), self.reset_hour_utc);
        let mut credentials = self.credentials.lock();
        for c in credentials.iter_mut() {
            c.quota_used = 0;
            c.is_active = true;
            c.permanently_disabled = false;
            c.last_error = None;
            c.reset_at = reset_at;
        }
        info!(provider = %self.provider_id, count = credentials.len(), "Key pool reset");
    }

    /// Persistable copy of the current state. Secrets are skipped on serialization.
    pub fn snapshot(&self) -> Vec<Credential> {
        self.credentials.lock().clone()
    }

    /// Load persisted usage for credentials still configured, then apply any
    /// daily reset that fell due while the process was down. Returns the
    /// number of credentials matched.
    pub fn restore(&self, records: &[Credential]) -> usize {
        self.restore_at(records, Utc::now())
    }

    pub fn restore_at(&self, records: &[Credential], now: DateTime<Utc>) -> usize {
        let mut credentials = self.credentials.lock();
        let mut matched = 0;
        for credential in credentials.iter_mut() {
            if let Some(record) = records.iter().find(|r| r.id == credential.id) {
                credential.absorb(record);
                matched += 1;
            }
        }
        self.apply_resets(&mut credentials, now);
        debug!(provider = %self.provider_id, matched, "Key pool state restored");
        matched
    }

    pub fn status(&self) -> Vec<CredentialStatus> {
        self.status_at(Utc::now())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> Vec<CredentialStatus> {
        let mut credentials = self.credentials.lock();
        self.apply_resets(&mut credentials, now);
        credentials.iter().map(CredentialStatus::from).collect()
    }

    fn apply_resets(&self, credentials: &mut [Credential], now: DateTime<Utc>) {
        for c in credentials.iter_mut() {
            if c.reset_if_due(now, self.reset_hour_utc) {
                debug!(provider = %self.provider_id, credential = %c.id, "Daily quota reset");
            }
        }
    }

    fn update(&self, id: &str, apply: impl FnOnce(&mut Credential)) {
        let mut credentials = self.credentials.lock();
        match credentials.iter_mut().find(|c| c.id == id) {
            Some(c) => apply(c),
            None => warn!(provider = %self.provider_id, credential = %id, "Unknown credential"),
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
