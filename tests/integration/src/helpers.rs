//! Test helpers for integration tests
//!
//! Client construction against the mock gateway, and polling for effects
//! that happen on spawned tasks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use relaycord_gateway::{Client, ConnectionState, EventCallbacks, GatewayResult, ReconnectPolicy};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::fixtures::{dispatch, ready};
use crate::mock_gateway::{mock_gateway, MockConnection, MockConnector, MockGateway};

/// Upper bound for any single wait in a test
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// URL the mock connector is handed
pub const MOCK_GATEWAY_URL: &str = "ws://gateway.test/?v=3";

/// A client running against the mock gateway
pub struct TestClient {
    pub client: Client,
    pub connector: Arc<MockConnector>,
    pub gateway: MockGateway,
    handle: JoinHandle<GatewayResult<()>>,
}

impl TestClient {
    /// Start a client with the given callbacks and reconnect policy
    pub fn start(callbacks: EventCallbacks, reconnect: ReconnectPolicy) -> Self {
        let (connector, gateway) = mock_gateway();
        let client = Client::builder("test-token")
            .gateway_url(MOCK_GATEWAY_URL)
            .connector(connector.clone())
            .callbacks(callbacks)
            .reconnect(reconnect)
            .build();

        let runner = client.clone();
        let handle = tokio::spawn(async move { runner.run().await });

        Self {
            client,
            connector,
            gateway,
            handle,
        }
    }

    /// Start a client without callbacks or reconnects
    pub fn start_default() -> Self {
        Self::start(EventCallbacks::new(), ReconnectPolicy::default())
    }

    /// Start a client that reconnects immediately, without an attempt cap
    pub fn start_default_reconnecting() -> Self {
        Self::start(EventCallbacks::new(), ReconnectPolicy::immediate())
    }

    /// Accept the next connection, read Identify and complete it with `ready`
    pub async fn handshake_with(&mut self, ready: Value) -> Result<MockConnection> {
        let mut connection = self.gateway.accept().await?;
        let identify = connection.next_sent().await?;
        if identify["op"] != 2 {
            bail!("expected Identify first, got {identify}");
        }

        connection.send_json(&dispatch("READY", 1, ready));
        self.wait_for_state(ConnectionState::Streaming).await?;
        Ok(connection)
    }

    /// Handshake with the default Ready fixture
    pub async fn handshake(&mut self) -> Result<MockConnection> {
        self.handshake_with(ready()).await
    }

    pub async fn wait_for_state(&self, state: ConnectionState) -> Result<()> {
        let mut states = self.client.subscribe_state();
        within(
            &format!("state {state}"),
            states.wait_for(|current| *current == state),
        )
        .await??;
        Ok(())
    }

    /// Wait for `run` to return
    pub async fn finished(self) -> Result<GatewayResult<()>> {
        Ok(tokio::time::timeout(RECV_TIMEOUT, self.handle).await??)
    }

    /// Stop the client and wait for `run` to return
    pub async fn stop(self) -> Result<GatewayResult<()>> {
        self.client.stop();
        self.finished().await
    }
}

/// Poll `check` until it holds or the timeout passes
pub async fn eventually<F>(what: &str, mut check: F) -> Result<()>
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    bail!("timed out waiting for: {what}")
}

/// Await a future with the test timeout
pub async fn within<T>(what: &str, future: impl Future<Output = T>) -> Result<T> {
    match tokio::time::timeout(RECV_TIMEOUT, future).await {
        Ok(value) => Ok(value),
        Err(_) => bail!("timed out waiting for: {what}"),
    }
}
