//! Chrome DevTools Protocol adapter for Wayfinder.
//!
//! Opens a dedicated tab on a Chrome instance started with
//! `--remote-debugging-port` and drives it through the page's own
//! WebSocket endpoint.

mod client;
mod driver;
mod error;
mod protocol;

pub use client::CdpClient;
pub use driver::CdpBrowserDriver;
pub use error::CdpError;
pub use protocol::{CdpErrorResponse, CdpRequest, CdpResponse, PageInfo};
