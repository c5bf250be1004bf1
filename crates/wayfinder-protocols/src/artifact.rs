//! Artifact storage protocol.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

/// Opaque reference to a stored artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(pub String);

impl ArtifactRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persists binary artifacts such as screenshots.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store `bytes` under `name` and return a reference to it.
    async fn put(&self, name: &str, bytes: Vec<u8>) -> Result<ArtifactRef, ArtifactError>;
}
