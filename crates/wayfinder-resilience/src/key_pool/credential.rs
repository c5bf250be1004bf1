//! A single API credential and its quota state.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Stable, non-reversible identifier for a secret.
pub fn credential_id(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    hex::encode(&digest[..6])
}

/// The first daily reset strictly after `now`.
pub fn next_reset_after(now: DateTime<Utc>, reset_hour_utc: u32) -> DateTime<Utc> {
    let today = now
        .date_naive()
        .and_hms_opt(reset_hour_utc.min(23), 0, 0)
        .map(|t| t.and_utc());

    match today {
        Some(at) if at > now => at,
        Some(at) => at + Duration::days(1),
        None => now + Duration::days(1),
    }
}

/// API credential with usage accounting.
///
/// The secret is never serialized and never shown by `Debug`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,

    #[serde(skip)]
    secret: String,

    pub is_active: bool,
    pub quota_used: u32,
    pub daily_limit: u32,
    pub reset_at: DateTime<Utc>,

    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_error: Option<String>,

    /// Set on authorization failure; survives daily resets.
    #[serde(default)]
    pub permanently_disabled: bool,

    /// Calls handed out but not yet settled. Process-local.
    #[serde(skip)]
    pub in_flight: u32,
}

impl Credential {
    pub fn new(secret: impl Into<String>, daily_limit: u32, reset_at: DateTime<Utc>) -> Self {
        let secret = secret.into();
        Self {
            id: credential_id(&secret),
            secret,
            is_active: true,
            quota_used: 0,
            daily_limit,
            reset_at,
            last_used: None,
            last_error: None,
            permanently_disabled: false,
            in_flight: 0,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Usable for the next call.
    pub fn is_available(&self) -> bool {
        self.is_active && !self.permanently_disabled && self.quota_used < self.daily_limit
    }

    /// Settled usage plus reserved calls.
    pub fn committed(&self) -> u32 {
        self.quota_used.saturating_add(self.in_flight)
    }

    /// Available and not fully reserved by calls still in flight.
    pub fn has_capacity(&self) -> bool {
        self.is_available() && self.committed() < self.daily_limit
    }

    /// Apply the daily reset if `now` is past `reset_at`. Returns true if reset.
    pub(crate) fn reset_if_due(&mut self, now: DateTime<Utc>, reset_hour_utc: u32) -> bool {
        if now <= self.reset_at {
            return false;
        }
        self.quota_used = 0;
        self.reset_at = next_reset_after(now, reset_hour_utc);
        if !self.permanently_disabled {
            self.is_active = true;
            self.last_error = None;
        }
        true
    }

    /// Copy persisted usage state onto this credential, keeping the secret.
    pub(crate) fn absorb(&mut self, record: &Credential) {
        self.is_active = record.is_active;
        self.quota_used = record.quota_used;
        self.reset_at = record.reset_at;
        self.last_used = record.last_used;
        self.last_error = record.last_error.clone();
        self.permanently_disabled = record.permanently_disabled;
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .field("is_active", &self.is_active)
            .field("quota_used", &self.quota_used)
            .field("daily_limit", &self.daily_limit)
            .field("reset_at", &self.reset_at)
            .field("last_used", &self.last_used)
            .field("last_error", &self.last_error)
            .field("permanently_disabled", &self.permanently_disabled)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}
