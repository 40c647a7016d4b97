//! Chat transports
//!
//! [`ChatTransport`] is one open connection carrying text frames; a
//! [`Connector`] opens one. Completing `connect` is the open event.

mod websocket;

use async_trait::async_trait;
use clubhub_common::ClientResult;

pub use websocket::{WsConnector, WsTransport};

/// One open, ordered, text-frame connection
#[async_trait]
pub trait ChatTransport: Send + 'static {
    /// Send one text frame
    async fn send(&mut self, text: String) -> ClientResult<()>;

    /// Receive the next text frame; `None` once the peer has closed
    ///
    /// Must be cancel-safe: it is polled inside `select!`.
    async fn recv(&mut self) -> Option<ClientResult<String>>;

    /// Close the connection
    async fn close(&mut self) -> ClientResult<()>;
}

/// Opens chat transports
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Transport: ChatTransport;

    /// Open a connection to `url`
    async fn connect(&self, url: &str) -> ClientResult<Self::Transport>;
}
