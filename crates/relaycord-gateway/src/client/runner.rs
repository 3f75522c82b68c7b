//! Gateway client
//!
//! Drives sessions: connect, identify, receive until the link drops, tear
//! down, and reconnect when the policy allows it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use relaycord_cache::SharedStateCache;
use relaycord_http::RestClient;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use super::builder::ClientBuilder;
use super::config::GatewayConfig;
use crate::connection::{
    spawn_writer, writer_failure, Connection, ConnectionState, Connector, FrameStream, Heartbeat,
    TransportError, TransportLink,
};
use crate::dispatch::{invoke, Context, EventCallbacks};
use crate::error::{GatewayError, GatewayResult};
use crate::events::GatewayEventType;
use crate::handlers::{EventRouter, ReadyHandler};
use crate::protocol::{GatewayMessage, IdentifyPayload, OpCode, StatusUpdatePayload};

/// How long teardown waits for the writer to flush and close
const WRITER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Gateway client handle
///
/// Cheap to clone; clones drive and observe the same client.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: GatewayConfig,
    connector: Arc<dyn Connector>,
    cache: SharedStateCache,
    http: Option<RestClient>,
    callbacks: Arc<EventCallbacks>,
    state: watch::Sender<ConnectionState>,
    shutdown: watch::Sender<bool>,
    current: Mutex<Option<Arc<Connection>>>,
}

/// How a session ended
enum SessionEnd {
    Stopped,
    Lost {
        error: GatewayError,
        reached_ready: bool,
    },
}

impl Client {
    /// Start building a client for the given token
    #[must_use]
    pub fn builder(token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    pub(crate) fn from_parts(
        config: GatewayConfig,
        connector: Arc<dyn Connector>,
        cache: SharedStateCache,
        http: Option<RestClient>,
        callbacks: EventCallbacks,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (shutdown, _) = watch::channel(false);

        Self {
            inner: Arc::new(ClientInner {
                config,
                connector,
                cache,
                http,
                callbacks: Arc::new(callbacks),
                state,
                shutdown,
                current: Mutex::new(None),
            }),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn cache(&self) -> &SharedStateCache {
        &self.inner.cache
    }

    pub fn http(&self) -> Option<&RestClient> {
        self.inner.http.as_ref()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    /// Watch connection state changes
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    // ========================================================================
    // Control
    // ========================================================================

    /// Ask [`Client::run`] to return
    ///
    /// Stopping is permanent for this client; later calls to `run` return
    /// immediately.
    pub fn stop(&self) {
        tracing::info!("Gateway stop requested");
        self.inner.shutdown.send_replace(true);
    }

    /// Set or clear the "playing" status on the live connection
    pub async fn set_playing(&self, game: Option<&str>) -> GatewayResult<()> {
        let connection = self
            .inner
            .current
            .lock()
            .clone()
            .ok_or(GatewayError::NotConnected)?;
        let frame = GatewayMessage::status_update(StatusUpdatePayload::playing(game))?;
        connection
            .send(frame)
            .await
            .map_err(|_| GatewayError::NotConnected)
    }

    /// Run sessions until stopped or until a loss the policy does not retry
    ///
    /// Returns `Ok(())` only after [`Client::stop`].
    pub async fn run(&self) -> GatewayResult<()> {
        let mut shutdown = self.inner.shutdown.subscribe();
        let policy = self.inner.config.reconnect;
        let mut attempt: u32 = 0;

        loop {
            if *shutdown.borrow_and_update() {
                return Ok(());
            }

            let (error, reached_ready) = match self.run_session(&mut shutdown).await {
                SessionEnd::Stopped => return Ok(()),
                SessionEnd::Lost {
                    error,
                    reached_ready,
                } => (error, reached_ready),
            };

            if error.is_fatal() {
                tracing::error!(error = %error, "Gateway connection failed permanently");
                return Err(error);
            }
            if !policy.enabled {
                tracing::warn!(error = %error, "Gateway connection lost");
                return Err(error);
            }

            if reached_ready {
                attempt = 0;
            }
            attempt += 1;

            if !policy.allows(attempt) {
                let attempts = attempt - 1;
                tracing::error!(attempts, error = %error, "Giving up on the gateway");
                return Err(GatewayError::ReconnectAttemptsExhausted {
                    attempts,
                    last: Box::new(error),
                });
            }

            tracing::warn!(attempt, error = %error, "Gateway connection lost, reconnecting");

            if !policy.delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(policy.delay) => {}
                    _ = shutdown.wait_for(|stopped| *stopped) => return Ok(()),
                }
            }
        }
    }

    // ========================================================================
    // Session
    // ========================================================================

    async fn run_session(&self, shutdown: &mut watch::Receiver<bool>) -> SessionEnd {
        self.set_state(ConnectionState::Connecting);

        let link = tokio::select! {
            biased;
            _ = shutdown.wait_for(|stopped| *stopped) => {
                self.set_state(ConnectionState::Disconnected);
                return SessionEnd::Stopped;
            }
            result = self.connect() => match result {
                Ok(link) => link,
                Err(error) => {
                    self.set_state(ConnectionState::Disconnected);
                    return SessionEnd::Lost { error, reached_ready: false };
                }
            },
        };

        let TransportLink { sink, mut stream } = link;
        let (tx, rx) = mpsc::channel(self.inner.config.event_buffer);
        let (close_tx, close_rx) = oneshot::channel();
        let (writer, failed) = spawn_writer(sink, rx, close_rx);
        let writer_failed = writer_failure(failed);
        tokio::pin!(writer_failed);

        let connection = Connection::new(tx.clone());
        *self.inner.current.lock() = Some(Arc::clone(&connection));
        let ctx = Context::new(Arc::clone(&self.inner.cache), self.inner.http.clone(), tx);

        self.set_state(ConnectionState::Handshaking);
        let result = match self.identify(&connection).await {
            Ok(()) => {
                self.receive_loop(&connection, &ctx, &mut stream, writer_failed, shutdown)
                    .await
            }
            Err(error) => Err(error),
        };

        let reached_ready = connection.is_synced();
        self.teardown(&connection, close_tx, writer).await;

        match result {
            Ok(()) => SessionEnd::Stopped,
            Err(error) => SessionEnd::Lost {
                error,
                reached_ready,
            },
        }
    }

    async fn connect(&self) -> GatewayResult<TransportLink> {
        let url = self.gateway_url().await?;
        tracing::info!(url = %url, "Connecting to gateway");
        Ok(self.inner.connector.connect(&url).await?)
    }

    async fn gateway_url(&self) -> GatewayResult<String> {
        if let Some(url) = &self.inner.config.url {
            return Ok(url.clone());
        }

        let http = self.inner.http.as_ref().ok_or(GatewayError::NoGatewayUrl)?;
        http.gateway_url().await.map_err(GatewayError::Discovery)
    }

    async fn identify(&self, connection: &Connection) -> GatewayResult<()> {
        let payload = IdentifyPayload::new(
            self.inner.config.token.clone(),
            self.inner.config.properties.clone(),
        );
        connection
            .send(GatewayMessage::identify(payload)?)
            .await
            .map_err(|_| GatewayError::ConnectionLost("writer closed before identify".into()))?;

        tracing::debug!("Identify sent");
        Ok(())
    }

    /// Read frames until stopped (`Ok`) or the link is lost (`Err`)
    async fn receive_loop(
        &self,
        connection: &Arc<Connection>,
        ctx: &Context,
        stream: &mut Box<dyn FrameStream>,
        mut writer_failed: Pin<&mut impl Future<Output = TransportError>>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> GatewayResult<()> {
        loop {
            let frame = tokio::select! {
                biased;
                _ = shutdown.wait_for(|stopped| *stopped) => return Ok(()),
                error = writer_failed.as_mut() => return Err(GatewayError::Transport(error)),
                frame = stream.next_frame() => frame,
            };

            let text = match frame {
                Some(Ok(text)) => text,
                Some(Err(e)) => return Err(GatewayError::from_transport(e)),
                None => return Err(GatewayError::ConnectionLost("stream ended".into())),
            };

            let message = match GatewayMessage::from_json(&text) {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping undecodable frame");
                    continue;
                }
            };

            tracing::trace!(op = %message.op, "Received frame");
            self.handle_frame(connection, ctx, message).await?;
        }
    }

    async fn handle_frame(
        &self,
        connection: &Arc<Connection>,
        ctx: &Context,
        message: GatewayMessage,
    ) -> GatewayResult<()> {
        if let Some(seq) = message.s {
            connection.record_sequence(seq);
        }

        match message.op {
            OpCode::Dispatch => {
                let GatewayMessage { t, d, .. } = message;
                self.dispatch(connection, ctx, t, d.unwrap_or(Value::Null));
                Ok(())
            }
            OpCode::Hello => {
                if let Some(hello) = message.as_hello() {
                    connection.set_hello_interval(hello.heartbeat_interval);
                    tracing::debug!(
                        heartbeat_interval = hello.heartbeat_interval,
                        "Hello received"
                    );
                }
                Ok(())
            }
            OpCode::Heartbeat => {
                // Liveness frames must not precede Ready
                if connection.is_synced() {
                    Heartbeat::try_beat(&connection.sender());
                } else {
                    tracing::debug!("Heartbeat requested before Ready, ignoring");
                }
                Ok(())
            }
            OpCode::HeartbeatAck => {
                tracing::trace!("Heartbeat acknowledged");
                Ok(())
            }
            OpCode::Reconnect => Err(GatewayError::ConnectionLost(
                "gateway requested a reconnect".into(),
            )),
            OpCode::InvalidSession => Err(GatewayError::InvalidSession),
            op @ (OpCode::Identify | OpCode::StatusUpdate) => {
                tracing::debug!(op = %op, "Ignoring client-only op code from the gateway");
                Ok(())
            }
        }
    }

    fn dispatch(
        &self,
        connection: &Arc<Connection>,
        ctx: &Context,
        tag: Option<String>,
        data: Value,
    ) {
        let Some(tag) = tag else {
            tracing::debug!("Dispatch frame without event type");
            return;
        };
        let Some(event) = GatewayEventType::from_str(&tag) else {
            tracing::trace!(event = %tag, "Ignoring unhandled event");
            return;
        };

        if event == GatewayEventType::Ready {
            self.apply_ready(connection, ctx, data);
            return;
        }

        tracing::trace!(
            event = %event,
            sequence = connection.sequence(),
            mutates_cache = event.mutates_cache(),
            "Dispatching event"
        );
        EventRouter::spawn(ctx.clone(), Arc::clone(&self.inner.callbacks), event, data);
    }

    /// Apply Ready inline so nothing observes a half-seeded session
    fn apply_ready(&self, connection: &Arc<Connection>, ctx: &Context, data: Value) {
        let ready = match ReadyHandler::apply(&self.inner.cache, data) {
            Ok(ready) => ready,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed Ready");
                return;
            }
        };

        self.set_state(ConnectionState::Synced);
        let period = connection.heartbeat_interval(ready.heartbeat_interval);
        connection.start_heartbeat(period);
        self.set_state(ConnectionState::Streaming);
        tracing::info!(heartbeat_interval = ?period, "Gateway session streaming");

        let ctx = ctx.clone();
        let callbacks = Arc::clone(&self.inner.callbacks);
        tokio::spawn(async move {
            invoke(callbacks.ready.as_ref(), ctx, ready).await;
        });
    }

    async fn teardown(
        &self,
        connection: &Arc<Connection>,
        close_tx: oneshot::Sender<()>,
        writer: JoinHandle<()>,
    ) {
        connection.stop_heartbeat();
        self.inner.current.lock().take();

        let _ = close_tx.send(());
        let abort = writer.abort_handle();
        if tokio::time::timeout(WRITER_SHUTDOWN_TIMEOUT, writer)
            .await
            .is_err()
        {
            tracing::warn!("Writer did not close in time, aborting");
            abort.abort();
        }

        self.inner.cache.clear();
        self.set_state(ConnectionState::Disconnected);
        tracing::info!(
            sequence = connection.sequence(),
            age = ?connection.age(),
            "Gateway connection closed"
        );
    }

    fn set_state(&self, state: ConnectionState) {
        let previous = self.inner.state.send_replace(state);
        if previous != state {
            tracing::debug!(from = %previous, to = %state, "Connection state changed");
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state())
            .field("url", &self.inner.config.url)
            .field("callbacks", &self.inner.callbacks)
            .finish_non_exhaustive()
    }
}
