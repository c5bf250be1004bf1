//! Browser driver errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Interaction failed: {0}")]
    Interaction(String),

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Browser action timed out after {0} seconds")]
    Timeout(u64),
}
