//! API key pools with daily quotas.

mod credential;
mod policy;
mod pool;
mod store;

pub use credential::{Credential, credential_id, next_reset_after};
pub use policy::{HealthBased, RoundRobin, SelectionPolicy};
pub use pool::{CredentialHealth, CredentialStatus, KeyPool};
pub use store::{FileKeyPoolStore, KeyPoolStore, MemoryKeyPoolStore};
