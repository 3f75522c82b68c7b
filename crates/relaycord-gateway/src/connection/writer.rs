//! Outbound writer task

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::transport::{FrameSink, TransportError};
use crate::protocol::GatewayMessage;

/// Drain queued frames into the sink until told to close
///
/// The queue may outlive the connection (callbacks hold senders), so the
/// writer stops on `close` or when every sender is gone, whichever comes
/// first. A failed send also stops it; that error is delivered on the
/// returned receiver, which otherwise resolves with an error once the task
/// ends. The sink is closed on the way out.
pub fn spawn_writer(
    mut sink: Box<dyn FrameSink>,
    mut rx: mpsc::Receiver<GatewayMessage>,
    mut close: oneshot::Receiver<()>,
) -> (JoinHandle<()>, oneshot::Receiver<TransportError>) {
    let (failed_tx, failed_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                biased;
                _ = &mut close => break,
                message = rx.recv() => match message {
                    Some(message) => message,
                    None => break,
                },
            };

            let frame = match message.to_json() {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!(op = %message.op, error = %e, "Failed to encode frame");
                    continue;
                }
            };

            tracing::trace!(op = %message.op, "Sending frame");
            if let Err(e) = sink.send_frame(frame).await {
                tracing::warn!(op = %message.op, error = %e, "Failed to send frame to gateway");
                let _ = failed_tx.send(e);
                break;
            }
        }

        if let Err(e) = sink.close().await {
            tracing::debug!(error = %e, "Failed to close gateway connection");
        }
    });

    (task, failed_rx)
}

/// Wait for the writer to report a failed send
///
/// Never resolves if the writer ends without one.
pub async fn writer_failure(failed: oneshot::Receiver<TransportError>) -> TransportError {
    match failed.await {
        Ok(error) => error,
        Err(_) => std::future::pending().await,
    }
}
