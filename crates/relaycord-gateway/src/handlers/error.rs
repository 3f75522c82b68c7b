//! Handler error types

use relaycord_cache::CacheError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::events::GatewayEventType;

/// Handler error type
///
/// Handler errors never end the connection; the router logs them and the
/// event is dropped.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Payload did not match the shape expected for its tag
    #[error("Failed to decode {event} payload: {source}")]
    Decode {
        event: GatewayEventType,
        #[source]
        source: serde_json::Error,
    },

    /// Payload decoded but could not be applied to the cache
    #[error("Failed to apply {event} to the cache: {source}")]
    Cache {
        event: GatewayEventType,
        #[source]
        source: CacheError,
    },

    #[error("{event} payload is missing `{field}`")]
    MissingField {
        event: GatewayEventType,
        field: &'static str,
    },
}

impl HandlerError {
    /// Event the failing payload was tagged with
    pub fn event(&self) -> GatewayEventType {
        match self {
            Self::Decode { event, .. }
            | Self::Cache { event, .. }
            | Self::MissingField { event, .. } => *event,
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Decode a dispatch payload into `T`
pub(crate) fn decode<T: DeserializeOwned>(event: GatewayEventType, data: Value) -> HandlerResult<T> {
    serde_json::from_value(data).map_err(|source| HandlerError::Decode { event, source })
}

/// Attach the event tag to a cache error
pub(crate) fn cache_err(event: GatewayEventType) -> impl FnOnce(CacheError) -> HandlerError {
    move |source| HandlerError::Cache { event, source }
}
