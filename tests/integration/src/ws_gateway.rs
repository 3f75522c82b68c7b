//! Loopback WebSocket gateway
//!
//! Serves real WebSocket upgrades with axum so the client's own
//! [`relaycord_gateway::WebSocketConnector`] is on the wire. Each accepted
//! socket is handed to the test as a [`WsPeer`].

use anyhow::{anyhow, bail, Context as _, Result};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::helpers::RECV_TIMEOUT;

/// Gateway listening on a random local port
pub struct WsGateway {
    url: String,
    accepted: mpsc::UnboundedReceiver<WebSocket>,
}

impl WsGateway {
    pub async fn start() -> Result<Self> {
        let (tx, accepted) = mpsc::unbounded_channel();
        let router = Router::new().route("/", get(upgrade)).with_state(tx);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            url: format!("ws://{addr}/"),
            accepted,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Wait for the next upgraded connection
    pub async fn accept(&mut self) -> Result<WsPeer> {
        let socket = tokio::time::timeout(RECV_TIMEOUT, self.accepted.recv())
            .await
            .context("timed out waiting for a WebSocket client")?
            .ok_or_else(|| anyhow!("gateway server stopped"))?;
        Ok(WsPeer { socket })
    }
}

async fn upgrade(
    State(accepted): State<mpsc::UnboundedSender<WebSocket>>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        let _ = accepted.send(socket);
    })
}

/// Server side of one WebSocket session
pub struct WsPeer {
    socket: WebSocket,
}

impl WsPeer {
    pub async fn send_json(&mut self, frame: &Value) -> Result<()> {
        self.socket.send(Message::Text(frame.to_string())).await?;
        Ok(())
    }

    /// Send a binary frame with arbitrary bytes
    pub async fn send_bytes(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.socket.send(Message::Binary(bytes)).await?;
        Ok(())
    }

    /// Next text frame from the client, parsed as JSON
    pub async fn next_json(&mut self) -> Result<Value> {
        loop {
            let message = tokio::time::timeout(RECV_TIMEOUT, self.socket.recv())
                .await
                .context("timed out waiting for a client frame")?
                .ok_or_else(|| anyhow!("client hung up"))??;
            match message {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Close(_) => bail!("client closed the socket"),
                _ => {}
            }
        }
    }

    /// Close with a gateway close code
    pub async fn close_with(mut self, code: u16, reason: &str) -> Result<()> {
        self.socket
            .send(Message::Close(Some(axum::extract::ws::CloseFrame {
                code,
                reason: reason.to_string().into(),
            })))
            .await?;
        Ok(())
    }
}
