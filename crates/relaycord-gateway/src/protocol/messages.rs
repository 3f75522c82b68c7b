//! Gateway frame envelope
//!
//! Every frame is `{"op", "t", "s", "d"}`. Decoding is two-staged: the
//! envelope first, with `d` left as raw JSON, then `d` by op code or event
//! tag.

use super::{HelloPayload, IdentifyPayload, OpCode, StatusUpdatePayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event type (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    // === Outbound ===

    /// Create an Identify message (op=2)
    pub fn identify(payload: IdentifyPayload) -> Result<Self, serde_json::Error> {
        Ok(Self::control(OpCode::Identify, serde_json::to_value(payload)?))
    }

    /// Create a Heartbeat message (op=1) carrying a unix timestamp in seconds
    #[must_use]
    pub fn heartbeat(timestamp: i64) -> Self {
        Self::control(OpCode::Heartbeat, Value::from(timestamp))
    }

    /// Create a StatusUpdate message (op=3)
    pub fn status_update(payload: StatusUpdatePayload) -> Result<Self, serde_json::Error> {
        Ok(Self::control(OpCode::StatusUpdate, serde_json::to_value(payload)?))
    }

    fn control(op: OpCode, data: Value) -> Self {
        Self {
            op,
            t: None,
            s: None,
            d: Some(data),
        }
    }

    // === Inbound ===

    /// Create a Dispatch message (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            t: Some(event_type.into()),
            s: Some(sequence),
            d: Some(data),
        }
    }

    /// Try to parse as a Hello payload (op=10)
    pub fn as_hello(&self) -> Option<HelloPayload> {
        if self.op != OpCode::Hello {
            return None;
        }
        self.d
            .as_ref()
            .and_then(|d| HelloPayload::deserialize(d).ok())
    }

    /// Take the payload out, `null` if absent
    #[must_use]
    pub fn into_data(self) -> Value {
        self.d.unwrap_or(Value::Null)
    }

    // === Utilities ===

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}
