//! Key pool persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::Credential;
use crate::error::KeyStoreError;

/// Stores credential usage keyed by provider ID.
#[async_trait]
pub trait KeyPoolStore: Send + Sync {
    /// Load the records saved for a provider.
    async fn load(&self, provider_id: &str) -> Result<Option<Vec<Credential>>, KeyStoreError>;

    /// Replace the records saved for a provider.
    async fn save(&self, provider_id: &str, records: &[Credential]) -> Result<(), KeyStoreError>;
}

/// In-memory store for testing.
#[derive(Default)]
pub struct MemoryKeyPoolStore {
    records: Mutex<BTreeMap<String, Vec<Credential>>>,
}

impl MemoryKeyPoolStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyPoolStore for MemoryKeyPoolStore {
    async fn load(&self, provider_id: &str) -> Result<Option<Vec<Credential>>, KeyStoreError> {
        Ok(self.records.lock().await.get(provider_id).cloned())
    }

    async fn save(&self, provider_id: &str, records: &[Credential]) -> Result<(), KeyStoreError> {
        self.records
            .lock()
            .await
            .insert(provider_id.to_string(), records.to_vec());
        Ok(())
    }
}

/// Single-file JSON store.
///
/// ```text
/// {
///   "gemini": [ { "id": "3fa1...", "quota_used": 12, ... } ],
///   "groq":   [ ... ]
/// }
/// ```
///
/// Writes go to a temporary sibling and are renamed into place.
pub struct FileKeyPoolStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyPoolStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, Vec<Credential>>, KeyStoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KeyPoolStore for FileKeyPoolStore {
    async fn load(&self, provider_id: &str) -> Result<Option<Vec<Credential>>, KeyStoreError> {
        let mut all = self.read_all().await?;
        Ok(all.remove(provider_id))
    }

    async fn save(&self, provider_id: &str, records: &[Credential]) -> Result<(), KeyStoreError> {
        let _guard = self.write_lock.lock().await;

        let mut all = self.read_all().await?;
        all.insert(provider_id.to_string(), records.to_vec());
        let json = serde_json::to_string_pretty(&all)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(provider = %provider_id, path = ?self.path, "Key pool state saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
