//! In-process gateway double
//!
//! [`MockConnector`] plugs into the client in place of the WebSocket. Every
//! connect attempt hands a [`MockConnection`] to the test through
//! [`MockGateway::accept`]; the test then plays the server side frame by
//! frame.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context as _, Result};
use async_trait::async_trait;
use relaycord_gateway::{Connector, FrameSink, FrameStream, TransportError, TransportLink};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::helpers::RECV_TIMEOUT;

type Inbound = Result<String, TransportError>;

/// Create a connector and the gateway side that accepts its connections
pub fn mock_gateway() -> (Arc<MockConnector>, MockGateway) {
    let (accepted_tx, accepted_rx) = mpsc::unbounded_channel();
    let connector = Arc::new(MockConnector {
        accepted: accepted_tx,
        attempts: AtomicUsize::new(0),
    });
    (connector, MockGateway { accepted: accepted_rx })
}

/// Client-side half handed to `Client::builder().connector(..)`
pub struct MockConnector {
    accepted: mpsc::UnboundedSender<MockConnection>,
    attempts: AtomicUsize,
}

impl MockConnector {
    /// Number of connect calls so far
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, url: &str) -> Result<TransportLink, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));

        let connection = MockConnection {
            url: url.to_string(),
            inbound: inbound_tx,
            outbound: outbound_rx,
            closed: Arc::clone(&closed),
        };
        self.accepted
            .send(connection)
            .map_err(|_| TransportError::Connect {
                url: url.to_string(),
                reason: "mock gateway is gone".into(),
            })?;

        Ok(TransportLink {
            sink: Box::new(MockSink {
                outbound: outbound_tx,
                closed,
            }),
            stream: Box::new(MockStream { inbound: inbound_rx }),
        })
    }
}

struct MockSink {
    outbound: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl FrameSink for MockSink {
    async fn send_frame(&mut self, frame: String) -> Result<(), TransportError> {
        self.outbound
            .send(frame)
            .map_err(|_| TransportError::Send("mock connection dropped".into()))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct MockStream {
    inbound: mpsc::UnboundedReceiver<Inbound>,
}

#[async_trait]
impl FrameStream for MockStream {
    async fn next_frame(&mut self) -> Option<Inbound> {
        self.inbound.recv().await
    }
}

/// Test-side receiver of connection attempts
pub struct MockGateway {
    accepted: mpsc::UnboundedReceiver<MockConnection>,
}

impl MockGateway {
    /// Wait for the client's next connection
    pub async fn accept(&mut self) -> Result<MockConnection> {
        tokio::time::timeout(RECV_TIMEOUT, self.accepted.recv())
            .await
            .context("timed out waiting for the client to connect")?
            .ok_or_else(|| anyhow!("connector dropped"))
    }
}

/// Server side of one connection
pub struct MockConnection {
    pub url: String,
    inbound: mpsc::UnboundedSender<Inbound>,
    outbound: mpsc::UnboundedReceiver<String>,
    closed: Arc<AtomicBool>,
}

impl MockConnection {
    /// Push a JSON frame to the client
    pub fn send_json(&self, frame: &Value) {
        self.send_raw(&frame.to_string());
    }

    /// Push a raw text frame, valid JSON or not
    pub fn send_raw(&self, text: &str) {
        let _ = self.inbound.send(Ok(text.to_string()));
    }

    /// Close the connection with a close code
    pub fn close_with(&self, code: u16, reason: &str) {
        let _ = self.inbound.send(Err(TransportError::Closed {
            code: Some(code),
            reason: reason.to_string(),
        }));
    }

    /// Next frame the client sent, parsed as JSON
    pub async fn next_sent(&mut self) -> Result<Value> {
        let frame = tokio::time::timeout(RECV_TIMEOUT, self.outbound.recv())
            .await
            .context("timed out waiting for a client frame")?
            .ok_or_else(|| anyhow!("client closed the connection"))?;
        Ok(serde_json::from_str(&frame)?)
    }

    /// Next frame with the given op code, skipping others
    pub async fn next_sent_op(&mut self, op: u64) -> Result<Value> {
        loop {
            let frame = self.next_sent().await?;
            if frame["op"].as_u64() == Some(op) {
                return Ok(frame);
            }
        }
    }

    /// Check that the client sends nothing for `window`
    pub async fn is_silent_for(&mut self, window: Duration) -> bool {
        matches!(
            tokio::time::timeout(window, self.outbound.recv()).await,
            Err(_) | Ok(None)
        )
    }

    /// Whether the client closed its side
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
