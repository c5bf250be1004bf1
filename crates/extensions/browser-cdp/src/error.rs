//! CDP error types.

use thiserror::Error;
use wayfinder_protocols::BrowserError;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not running with remote debugging.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("{what} timed out after {secs}s")]
    Timeout { what: String, secs: u64 },

    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CdpError {
    /// Map onto the driver-level error, using `op` for failures that belong
    /// to the operation itself rather than to the transport.
    pub(crate) fn into_browser(self, op: fn(String) -> BrowserError) -> BrowserError {
        match self {
            CdpError::ConnectionFailed(_)
            | CdpError::ChromeNotAvailable(_)
            | CdpError::WebSocket(_)
            | CdpError::Http(_)
            | CdpError::SessionClosed => BrowserError::Connection(self.to_string()),
            CdpError::Timeout { secs, .. } => BrowserError::Timeout(secs),
            CdpError::NavigationFailed(msg) => BrowserError::Navigation(msg),
            CdpError::JavaScript(msg) => BrowserError::Script(msg),
            other => op(other.to_string()),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.without_url().to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_map_to_connection() {
        let err = CdpError::SessionClosed.into_browser(BrowserError::Capture);
        assert!(matches!(err, BrowserError::Connection(_)));

        let err = CdpError::WebSocket("reset".into()).into_browser(BrowserError::Interaction);
        assert!(matches!(err, BrowserError::Connection(_)));
    }

    #[test]
    fn test_timeout_keeps_seconds() {
        let err = CdpError::Timeout {
            what: "Page.navigate".into(),
            secs: 30,
        }
        .into_browser(BrowserError::Navigation);
        assert!(matches!(err, BrowserError::Timeout(30)));
    }

    #[test]
    fn test_protocol_error_uses_operation_variant() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "No node".into(),
        }
        .into_browser(BrowserError::Interaction);
        match err {
            BrowserError::Interaction(msg) => assert!(msg.contains("No node")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_script_and_navigation_keep_their_kind() {
        let err = CdpError::JavaScript("boom".into()).into_browser(BrowserError::Capture);
        assert!(matches!(err, BrowserError::Script(m) if m == "boom"));

        let err = CdpError::NavigationFailed("net::ERR_NAME_NOT_RESOLVED".into())
            .into_browser(BrowserError::Capture);
        assert!(matches!(err, BrowserError::Navigation(_)));
    }
}
