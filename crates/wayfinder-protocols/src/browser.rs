//! Browser driver protocol.

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::types::Bounds;

/// Browser automation primitives consumed by the explorer.
///
/// A driver wraps one page; callers must not issue concurrent actions.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to URL and wait for the page to load.
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// Click the center of the given bounds.
    async fn click(&self, bounds: &Bounds) -> Result<(), BrowserError>;

    /// Capture a PNG screenshot of the viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError>;

    /// Current page URL.
    async fn current_url(&self) -> Result<String, BrowserError>;

    /// Tag/id/class digest of the visible DOM nodes.
    async fn dom_structural_summary(&self) -> Result<String, BrowserError>;
}
