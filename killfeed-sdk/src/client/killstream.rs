//! zKillboard websocket client.
//!
//! The connection is deliberately dumb: it knows how to subscribe and how
//! to hand back text frames. Reconnection and decoding belong to the
//! caller, which decides how a dropped socket or a bad frame is handled.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;
use url::Url;

use super::ClientError;
use crate::objects::KillstreamCommand;

/// Opens connections to the kill stream websocket.
#[derive(Debug, Clone)]
pub struct KillstreamClient {
    url: Url,
}

impl KillstreamClient {
    pub const DEFAULT_URL: &'static str = "wss://zkillboard.com/websocket/";

    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Perform the websocket handshake.
    pub async fn connect(&self) -> Result<KillstreamConnection, ClientError> {
        let (stream, _response) = connect_async(self.url.as_str()).await?;
        Ok(KillstreamConnection { stream })
    }
}

/// One live websocket session.
pub struct KillstreamConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl KillstreamConnection {
    /// Send the subscription control frame for `channel`.
    pub async fn subscribe(&mut self, channel: &str) -> Result<(), ClientError> {
        let frame = serde_json::to_string(&KillstreamCommand::subscribe(channel))?;
        self.stream.send(Message::Text(frame)).await?;
        Ok(())
    }

    /// Wait for the next text frame.
    ///
    /// Returns `Ok(None)` once the server closes the session. Ping, pong
    /// and binary frames are skipped; pings are answered by tungstenite
    /// itself on the next read.
    pub async fn next_text(&mut self) -> Result<Option<String>, ClientError> {
        while let Some(message) = self.stream.next().await {
            match message? {
                Message::Text(text) => return Ok(Some(text)),
                Message::Close(frame) => {
                    debug!(frame = ?frame, "kill stream sent close frame");
                    return Ok(None);
                }
                _ => {}
            }
        }
        Ok(None)
    }
}
