//! WebSocket transport on tokio-tungstenite

use async_trait::async_trait;
use clubhub_common::{ClientError, ClientResult};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use super::{ChatTransport, Connector};

/// Opens [`WsTransport`] connections
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    type Transport = WsTransport;

    async fn connect(&self, url: &str) -> ClientResult<WsTransport> {
        let (stream, response) = connect_async(url).await.map_err(ClientError::websocket)?;
        info!(url = %url, status = %response.status(), "WebSocket connected");
        Ok(WsTransport { stream })
    }
}

/// A raw WebSocket carrying JSON text frames
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl ChatTransport for WsTransport {
    async fn send(&mut self, text: String) -> ClientResult<()> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(ClientError::websocket)
    }

    async fn recv(&mut self) -> Option<ClientResult<String>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "WebSocket close frame received");
                    return None;
                }
                // Pings are answered by tungstenite on the next read or write
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {}
                Ok(Message::Binary(data)) => {
                    debug!(len = data.len(), "Ignoring binary frame");
                }
                Err(e) => return Some(Err(ClientError::websocket(e))),
            }
        }
    }

    async fn close(&mut self) -> ClientResult<()> {
        self.stream.close(None).await.map_err(ClientError::websocket)
    }
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransport").finish_non_exhaustive()
    }
}
