//! [`BrowserDriver`] implementation over a [`CdpClient`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tracing::debug;
use wayfinder_protocols::{BrowserDriver, BrowserError, Bounds};

use crate::client::CdpClient;
use crate::error::CdpError;

const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One `tag#id.class.class` line per rendered element under `<body>`.
/// Class names are sorted so equivalent markup yields the same line.
pub(crate) const STRUCTURAL_SUMMARY_JS: &str = r#"(() => {
  const lines = [];
  for (const el of document.querySelectorAll('body *')) {
    const style = window.getComputedStyle(el);
    if (style.display === 'none' || style.visibility === 'hidden') continue;
    const rect = el.getBoundingClientRect();
    if (rect.width === 0 && rect.height === 0) continue;
    let line = el.tagName.toLowerCase();
    if (el.id) line += '#' + el.id;
    const cls = typeof el.className === 'string'
      ? el.className.split(/\s+/).filter(Boolean).sort()
      : [];
    if (cls.length) line += '.' + cls.join('.');
    lines.push(line);
  }
  return lines.join('\n');
})()"#;

/// Browser driver speaking CDP to a single tab.
pub struct CdpBrowserDriver {
    client: CdpClient,
    load_timeout: Duration,
}

impl CdpBrowserDriver {
    pub fn new(client: CdpClient) -> Self {
        Self {
            client,
            load_timeout: Duration::from_secs(30),
        }
    }

    /// Open a new tab on the Chrome instance at `endpoint`.
    pub async fn connect(endpoint: &str) -> Result<Self, BrowserError> {
        let client = CdpClient::connect(endpoint)
            .await
            .map_err(|e| e.into_browser(BrowserError::Connection))?;
        let driver = Self::new(client);
        driver
            .client
            .call("Page.enable", None)
            .await
            .map_err(|e| e.into_browser(BrowserError::Connection))?;
        Ok(driver)
    }

    /// How long `navigate` waits for the document to become ready.
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn client(&self) -> &CdpClient {
        &self.client
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .client
            .call("Runtime.evaluate", Some(evaluate_params(expression)))
            .await?;
        evaluate_value(result)
    }

    async fn wait_for_load(&self) -> Result<(), CdpError> {
        let start = Instant::now();
        loop {
            let state = self.evaluate("document.readyState").await?;
            if matches!(state.as_str(), Some("complete" | "interactive")) {
                return Ok(());
            }
            if start.elapsed() > self.load_timeout {
                return Err(CdpError::Timeout {
                    what: "page load".to_string(),
                    secs: self.load_timeout.as_secs(),
                });
            }
            tokio::time::sleep(LOAD_POLL_INTERVAL).await;
        }
    }

    async fn navigate_inner(&self, url: &str) -> Result<(), CdpError> {
        let result = self
            .client
            .call("Page.navigate", Some(json!({ "url": url })))
            .await?;
        if let Some(error) = result.get("errorText").and_then(Value::as_str) {
            return Err(CdpError::NavigationFailed(format!("{}: {}", url, error)));
        }
        self.wait_for_load().await
    }

    async fn click_inner(&self, bounds: &Bounds) -> Result<(), CdpError> {
        let (x, y) = bounds.center();
        for kind in ["mouseMoved", "mousePressed", "mouseReleased"] {
            self.client
                .call("Input.dispatchMouseEvent", Some(mouse_event(kind, x, y)))
                .await?;
        }
        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for CdpBrowserDriver {
    async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.navigate_inner(url)
            .await
            .map_err(|e| e.into_browser(BrowserError::Navigation))?;
        debug!("Navigated to {}", url);
        Ok(())
    }

    async fn click(&self, bounds: &Bounds) -> Result<(), BrowserError> {
        if bounds.is_empty() {
            return Err(BrowserError::Interaction(format!(
                "empty bounds {}x{}",
                bounds.width, bounds.height
            )));
        }
        self.click_inner(bounds)
            .await
            .map_err(|e| e.into_browser(BrowserError::Interaction))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
        let result = self
            .client
            .call("Page.captureScreenshot", Some(json!({ "format": "png" })))
            .await
            .map_err(|e| e.into_browser(BrowserError::Capture))?;
        decode_screenshot(&result)
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        let value = self
            .evaluate("window.location.href")
            .await
            .map_err(|e| e.into_browser(BrowserError::Script))?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn dom_structural_summary(&self) -> Result<String, BrowserError> {
        let value = self
            .evaluate(STRUCTURAL_SUMMARY_JS)
            .await
            .map_err(|e| e.into_browser(BrowserError::Script))?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

fn evaluate_params(expression: &str) -> Value {
    json!({
        "expression": expression,
        "returnByValue": true,
        "awaitPromise": true,
    })
}

fn evaluate_value(result: Value) -> Result<Value, CdpError> {
    if let Some(exception) = result.get("exceptionDetails") {
        let text = exception["exception"]["description"]
            .as_str()
            .or_else(|| exception["text"].as_str())
            .unwrap_or("Unknown error");
        return Err(CdpError::JavaScript(text.to_string()));
    }
    Ok(result["result"]["value"].clone())
}

fn mouse_event(kind: &str, x: f64, y: f64) -> Value {
    let mut event = json!({
        "type": kind,
        "x": x,
        "y": y,
    });
    if kind != "mouseMoved" {
        event["button"] = json!("left");
        event["clickCount"] = json!(1);
    }
    event
}

fn decode_screenshot(result: &Value) -> Result<Vec<u8>, BrowserError> {
    let data = result["data"]
        .as_str()
        .ok_or_else(|| BrowserError::Capture("missing screenshot data".to_string()))?;
    STANDARD
        .decode(data)
        .map_err(|e| BrowserError::Capture(format!("invalid screenshot encoding: {}", e)))
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
