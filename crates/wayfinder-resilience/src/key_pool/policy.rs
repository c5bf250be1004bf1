//! Credential selection policies.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::Credential;

/// Picks one credential among those currently available.
pub trait SelectionPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns an index into `available`, which is never empty.
    fn select(&self, available: &[&Credential]) -> Option<usize>;
}

/// Lowest committed usage first, ties broken by least recently used.
#[derive(Debug, Default)]
pub struct HealthBased;

impl SelectionPolicy for HealthBased {
    fn name(&self) -> &'static str {
        "health"
    }

    fn select(&self, available: &[&Credential]) -> Option<usize> {
        available
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| (c.committed(), c.last_used))
            .map(|(i, _)| i)
    }
}

/// Cycles through available credentials in order.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl SelectionPolicy for RoundRobin {
    fn name(&self) -> &'static str {
        "round_robin"
    }

    fn select(&self, available: &[&Credential]) -> Option<usize> {
        if available.is_empty() {
            return None;
        }
        Some(self.cursor.fetch_add(1, Ordering::Relaxed) % available.len())
    }
}
