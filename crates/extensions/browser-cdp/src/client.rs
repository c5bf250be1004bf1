//! CDP WebSocket client bound to a single page target.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use crate::error::CdpError;
use crate::protocol::{CdpRequest, CdpResponse, PageInfo};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, CdpError>>>>>;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// CDP client for one tab.
///
/// Commands go straight to the page socket, so no target attach or session
/// id is needed.
pub struct CdpClient {
    http_endpoint: Option<String>,
    target_id: Option<String>,
    ws_tx: tokio::sync::Mutex<WsSink>,
    request_id: AtomicU64,
    pending: Pending,
    call_timeout: Duration,
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Open a fresh tab on the Chrome instance at `endpoint`
    /// (e.g. `http://localhost:9222`) and connect to it.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        url::Url::parse(&http_endpoint)?;

        // Chrome requires PUT for /json/new
        let create_url = format!("{}/json/new", http_endpoint);
        debug!("Creating page via {}", create_url);

        let page: PageInfo = reqwest::Client::new()
            .put(&create_url)
            .send()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e.without_url())))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e.without_url())))?;

        let ws_url = page.web_socket_debugger_url.clone().ok_or_else(|| {
            CdpError::InvalidResponse(format!("page {} has no webSocketDebuggerUrl", page.id))
        })?;

        let mut client = Self::connect_ws(&ws_url).await?;
        client.http_endpoint = Some(http_endpoint);
        client.target_id = Some(page.id);
        Ok(client)
    }

    /// Connect directly to a page WebSocket URL.
    pub async fn connect_ws(ws_url: &str) -> Result<Self, CdpError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending).await;
            })
        };

        debug!("CDP client connected to {}", ws_url);

        Ok(Self {
            http_endpoint: None,
            target_id: None,
            ws_tx: tokio::sync::Mutex::new(ws_sink),
            request_id: AtomicU64::new(1),
            pending,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            recv_task,
        })
    }

    /// Upper bound for a single command round trip.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref()
    }

    async fn receive_loop(mut ws_source: WsSource, pending: Pending) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<CdpResponse>(&text) {
                    Ok(resp) => {
                        if let Some(id) = resp.id {
                            let waiter = pending.lock().remove(&id);
                            if let Some(tx) = waiter {
                                let result = match resp.error {
                                    Some(error) => Err(CdpError::Protocol {
                                        code: error.code,
                                        message: error.message,
                                    }),
                                    None => Ok(resp.result.unwrap_or(Value::Null)),
                                };
                                let _ = tx.send(result);
                            }
                        } else if let Some(method) = resp.method {
                            trace!("CDP event: {}", method);
                        }
                    }
                    Err(e) => warn!("Failed to parse CDP message: {}", e),
                },
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    warn!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
        // Dropping the senders wakes every waiter with SessionClosed.
        pending.lock().clear();
    }

    /// Send a CDP command and wait for its reply.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(self.call_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout {
                    what: method.to_string(),
                    secs: self.call_timeout.as_secs(),
                })
            }
        }
    }

    /// Close the tab this client opened. No-op for direct socket connections.
    pub async fn close(&self) -> Result<(), CdpError> {
        let (Some(endpoint), Some(target_id)) = (&self.http_endpoint, &self.target_id) else {
            return Ok(());
        };
        let close_url = format!("{}/json/close/{}", endpoint, target_id);
        reqwest::get(&close_url).await?.error_for_status()?;
        debug!("Closed page {}", target_id);
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}
