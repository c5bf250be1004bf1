//! Screenshot storage backends.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::fs;
use tracing::debug;

use wayfinder_protocols::{ArtifactError, ArtifactRef, ArtifactStore};

fn validate_name(name: &str) -> Result<(), ArtifactError> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
    {
        return Err(ArtifactError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Writes artifacts as files in one directory.
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<ArtifactRef, ArtifactError> {
        validate_name(name)?;
        fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(name);
        let size = bytes.len();
        fs::write(&path, bytes).await?;
        debug!(path = ?path, size, "Artifact written");

        Ok(ArtifactRef(path.display().to_string()))
    }
}

/// Keeps artifacts in memory.
#[derive(Default)]
pub struct MemoryArtifactStore {
    items: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.items.lock().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<ArtifactRef, ArtifactError> {
        validate_name(name)?;
        self.items.lock().insert(name.to_string(), bytes);
        Ok(ArtifactRef(format!("memory://{}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_writes_png() {
        let dir = TempDir::new().unwrap();
        let store = FileArtifactStore::new(dir.path().join("shots"));

        let reference = store.put("step-0000.png", vec![0x89, b'P', b'N', b'G']).await.unwrap();
        let written = std::fs::read(reference.as_str()).unwrap();
        assert_eq!(written, vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = TempDir::new().unwrap();
        let store = FileArtifactStore::new(dir.path());
        for name in ["../evil.png", "a/b.png", "", ".hidden"] {
            let result = store.put(name, vec![1]).await;
            assert!(matches!(result, Err(ArtifactError::InvalidName(_))), "{name}");
        }
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryArtifactStore::new();
        let reference = store.put("a.png", vec![1, 2]).await.unwrap();
        assert_eq!(reference.as_str(), "memory://a.png");
        assert_eq!(store.get("a.png"), Some(vec![1, 2]));
        assert_eq!(store.len(), 1);
    }
}
