//! Transport seam
//!
//! The gateway session talks to the network only through these traits. The
//! production implementation is the WebSocket in [`super::websocket`]; tests
//! plug in a channel-backed transport instead.

use async_trait::async_trait;
use thiserror::Error;

/// Transport error type
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("Failed to send frame: {0}")]
    Send(String),

    #[error("Failed to receive frame: {0}")]
    Receive(String),

    /// The peer sent a close frame
    #[error("Connection closed (code {code:?}): {reason}")]
    Closed { code: Option<u16>, reason: String },
}

/// Outbound half of a connection
#[async_trait]
pub trait FrameSink: Send {
    /// Send one text frame
    async fn send_frame(&mut self, frame: String) -> Result<(), TransportError>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Inbound half of a connection
#[async_trait]
pub trait FrameStream: Send {
    /// Next text frame, an error, or `None` once the stream has ended
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>>;
}

/// Both halves of a freshly opened connection
pub struct TransportLink {
    pub sink: Box<dyn FrameSink>,
    pub stream: Box<dyn FrameStream>,
}

impl std::fmt::Debug for TransportLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportLink").finish_non_exhaustive()
    }
}

/// Opens connections to a gateway URL
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<TransportLink, TransportError>;
}
