//! Gateway error types

use relaycord_http::HttpError;
use thiserror::Error;

use crate::connection::TransportError;
use crate::protocol::CloseAction;

/// Errors that end [`crate::Client::run`]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway rejected the token (close code 4004)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The gateway answered with op 7
    #[error("Session was invalidated by the gateway")]
    InvalidSession,

    /// Closed with a code that forbids reconnecting
    #[error("Gateway closed the connection with code {code}: {reason}")]
    Closed { code: u16, reason: String },

    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Gateway discovery failed: {0}")]
    Discovery(#[source] HttpError),

    #[error("No gateway URL configured and no REST client to discover one")]
    NoGatewayUrl,

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    /// No connection is open right now
    #[error("Not connected to the gateway")]
    NotConnected,

    #[error("Gave up after {attempts} reconnect attempts: {last}")]
    ReconnectAttemptsExhausted {
        attempts: u32,
        #[source]
        last: Box<GatewayError>,
    },
}

impl GatewayError {
    /// Classify a transport failure by the close code's action
    pub fn from_transport(error: TransportError) -> Self {
        match error {
            TransportError::Closed {
                code: Some(code),
                reason,
            } => match CloseAction::for_code(code) {
                CloseAction::Reauthenticate => Self::AuthenticationFailed(reason),
                CloseAction::GiveUp => Self::Closed { code, reason },
                CloseAction::Reconnect => Self::Transport(TransportError::Closed {
                    code: Some(code),
                    reason,
                }),
            },
            other => Self::Transport(other),
        }
    }

    /// Check if retrying cannot help
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed(_)
                | Self::InvalidSession
                | Self::Closed { .. }
                | Self::NoGatewayUrl
                | Self::Encode(_)
                | Self::ReconnectAttemptsExhausted { .. }
        )
    }
}

/// Gateway result type
pub type GatewayResult<T> = Result<T, GatewayError>;
