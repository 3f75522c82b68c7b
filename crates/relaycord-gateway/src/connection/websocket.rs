//! WebSocket transport
//!
//! [`Connector`] over `tokio-tungstenite`. Text frames pass through as-is,
//! binary frames are read as UTF-8 (and dropped when they are not), and
//! control frames are swallowed.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::transport::{Connector, FrameSink, FrameStream, TransportError, TransportLink};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connects over a real WebSocket
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self, url: &str) -> Result<TransportLink, TransportError> {
        let (socket, response) =
            connect_async(url)
                .await
                .map_err(|e| TransportError::Connect {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

        tracing::debug!(
            url = %url,
            status = response.status().as_u16(),
            "WebSocket connection established"
        );

        let (sink, stream) = socket.split();
        Ok(TransportLink {
            sink: Box::new(WebSocketSink { inner: sink }),
            stream: Box::new(WebSocketFrames { inner: stream }),
        })
    }
}

struct WebSocketSink {
    inner: SplitSink<WsStream, Message>,
}

#[async_trait]
impl FrameSink for WebSocketSink {
    async fn send_frame(&mut self, frame: String) -> Result<(), TransportError> {
        self.inner
            .send(Message::Text(frame))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.inner
            .close()
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}

struct WebSocketFrames {
    inner: SplitStream<WsStream>,
}

#[async_trait]
impl FrameStream for WebSocketFrames {
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            let message = match self.inner.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(TransportError::Receive(e.to_string()))),
            };

            match message {
                Message::Text(text) => return Some(Ok(text)),
                Message::Binary(bytes) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(Ok(text)),
                    Err(e) => {
                        tracing::warn!(
                            len = e.as_bytes().len(),
                            error = %e.utf8_error(),
                            "Dropping binary frame that is not UTF-8"
                        );
                    }
                },
                Message::Close(frame) => {
                    let (code, reason) = frame.map_or((None, String::new()), |f| {
                        (Some(u16::from(f.code)), f.reason.into_owned())
                    });
                    tracing::debug!(code = ?code, reason = %reason, "Close frame received");
                    return Some(Err(TransportError::Closed { code, reason }));
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {
                    tracing::trace!("Control frame received");
                }
            }
        }
    }
}
