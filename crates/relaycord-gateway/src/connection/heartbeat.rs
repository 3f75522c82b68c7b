//! Heartbeat task

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::protocol::GatewayMessage;

/// Interval used when neither Ready nor Hello names one
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(45_000);

/// Periodic liveness frames
pub struct Heartbeat;

impl Heartbeat {
    /// Beat every `period`, the first one a full period from now
    ///
    /// The task ends by itself once the outbound queue is closed.
    pub fn spawn(period: Duration, sender: mpsc::Sender<GatewayMessage>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if !Self::beat(&sender).await {
                    break;
                }
            }
        })
    }

    /// Queue a single heartbeat stamped with the current unix time
    ///
    /// Returns `false` if the connection is gone.
    pub async fn beat(sender: &mpsc::Sender<GatewayMessage>) -> bool {
        let timestamp = chrono::Utc::now().timestamp();
        match sender.send(GatewayMessage::heartbeat(timestamp)).await {
            Ok(()) => {
                tracing::trace!(timestamp, "Heartbeat sent");
                true
            }
            Err(_) => {
                tracing::debug!("Heartbeat stopped, connection closed");
                false
            }
        }
    }

    /// Queue a heartbeat only if the outbound queue has room right now
    ///
    /// For answering the gateway from the receive loop, which must not wait
    /// on the writer. A full queue drops the beat.
    pub fn try_beat(sender: &mpsc::Sender<GatewayMessage>) -> bool {
        let timestamp = chrono::Utc::now().timestamp();
        match sender.try_send(GatewayMessage::heartbeat(timestamp)) {
            Ok(()) => {
                tracing::trace!(timestamp, "Heartbeat reply queued");
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    capacity = sender.max_capacity(),
                    "Outbound queue full, heartbeat reply dropped"
                );
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Heartbeat reply skipped, connection closed");
                false
            }
        }
    }
}
