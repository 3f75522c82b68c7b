//! Live gateway connection
//!
//! Per-connection state: the outbound queue, the last sequence number, the
//! heartbeat interval announced by the gateway and the heartbeat task.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::heartbeat::{Heartbeat, DEFAULT_HEARTBEAT_INTERVAL};
use crate::protocol::GatewayMessage;

/// Lifecycle of one gateway session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// No connection; also the state after a loss or stop
    #[default]
    Disconnected,
    /// Opening the transport
    Connecting,
    /// Identify sent, waiting for Ready
    Handshaking,
    /// Ready applied to the cache
    Synced,
    /// Heartbeat running, dispatch events flowing
    Streaming,
}

impl ConnectionState {
    /// Check if a transport is open
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Handshaking | Self::Synced | Self::Streaming)
    }

    /// Check if Ready has been applied
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Synced | Self::Streaming)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Handshaking => "handshaking",
            Self::Synced => "synced",
            Self::Streaming => "streaming",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single gateway connection
pub struct Connection {
    /// Queue drained by the writer task
    sender: mpsc::Sender<GatewayMessage>,

    /// Last sequence number received
    sequence: AtomicU64,

    /// Interval from Hello, if one arrived
    hello_interval: Mutex<Option<Duration>>,

    /// Set once Ready has been applied
    synced: AtomicBool,

    heartbeat: Mutex<Option<JoinHandle<()>>>,

    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(sender: mpsc::Sender<GatewayMessage>) -> Arc<Self> {
        Arc::new(Self {
            sender,
            sequence: AtomicU64::new(0),
            hello_interval: Mutex::new(None),
            synced: AtomicBool::new(false),
            heartbeat: Mutex::new(None),
            created_at: Instant::now(),
        })
    }

    // ========================================================================
    // Outbound
    // ========================================================================

    /// Queue a frame for the writer
    pub async fn send(
        &self,
        message: GatewayMessage,
    ) -> Result<(), mpsc::error::SendError<GatewayMessage>> {
        self.sender.send(message).await
    }

    /// Get a clone of the sender channel
    pub fn sender(&self) -> mpsc::Sender<GatewayMessage> {
        self.sender.clone()
    }

    /// Check if the writer has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    // ========================================================================
    // Sequence
    // ========================================================================

    pub fn record_sequence(&self, seq: u64) {
        self.sequence.store(seq, Ordering::SeqCst);
    }

    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    // ========================================================================
    // Heartbeat
    // ========================================================================

    /// Remember the interval from Hello; zero is ignored
    pub fn set_hello_interval(&self, interval_ms: u64) {
        if interval_ms > 0 {
            *self.hello_interval.lock() = Some(Duration::from_millis(interval_ms));
        }
    }

    /// Resolve the heartbeat interval
    ///
    /// Ready's value wins, then Hello's, then [`DEFAULT_HEARTBEAT_INTERVAL`].
    pub fn heartbeat_interval(&self, ready_interval_ms: Option<u64>) -> Duration {
        ready_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .or(*self.hello_interval.lock())
            .unwrap_or(DEFAULT_HEARTBEAT_INTERVAL)
    }

    /// Mark Ready as applied and start beating every `period`
    ///
    /// A running heartbeat is replaced.
    pub fn start_heartbeat(&self, period: Duration) {
        self.synced.store(true, Ordering::SeqCst);
        let task = Heartbeat::spawn(period, self.sender());
        if let Some(previous) = self.heartbeat.lock().replace(task) {
            previous.abort();
        }
    }

    pub fn stop_heartbeat(&self) {
        if let Some(task) = self.heartbeat.lock().take() {
            task.abort();
        }
    }

    pub fn is_heartbeating(&self) -> bool {
        self.heartbeat
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Check if Ready was applied on this connection
    pub fn is_synced(&self) -> bool {
        self.synced.load(Ordering::SeqCst)
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.stop_heartbeat();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("sequence", &self.sequence())
            .field("synced", &self.is_synced())
            .field("age", &self.age())
            .finish()
    }
}
