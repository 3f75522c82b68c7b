//! Event payload definitions
//!
//! Most dispatch payloads decode straight into `relaycord_core` entities.
//! This module holds the ones that need a wrapper: the Ready snapshot and
//! the channel payload whose shape depends on a discriminator.

use relaycord_core::{Channel, Guild, PrivateChannel, User};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// === Connection Events ===

/// READY event payload
///
/// Bulk snapshot sent after Identify. It seeds the whole state cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyEvent {
    /// Heartbeat interval in milliseconds, when the gateway sends it here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_interval: Option<u64>,

    /// Authenticated user
    pub user: User,

    #[serde(default)]
    pub guilds: Vec<Guild>,

    #[serde(default)]
    pub private_channels: Vec<PrivateChannel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Gateway protocol version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u8>,
}

// === Channel Events ===

/// Channel payload of CHANNEL_CREATE / CHANNEL_DELETE
///
/// The same tag carries either a guild channel or a private channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelPayload {
    Guild(Channel),
    Private(PrivateChannel),
}

/// Wire `type` values that denote a private channel
const PRIVATE_CHANNEL_TYPES: [u64; 2] = [1, 3];

impl ChannelPayload {
    /// Decode by peeking at the discriminator
    ///
    /// `is_private` wins when present. Without it, a `recipient` object or a
    /// numeric private `type` marks a private channel. Payloads that list
    /// `recipients` instead of a single `recipient` use the first entry.
    pub fn decode(mut data: Value) -> Result<Self, serde_json::Error> {
        if Self::is_private(&data) {
            if let Some(object) = data.as_object_mut() {
                if !object.contains_key("recipient") {
                    let first = object
                        .get("recipients")
                        .and_then(Value::as_array)
                        .and_then(|r| r.first())
                        .cloned();
                    if let Some(recipient) = first {
                        object.insert("recipient".to_string(), recipient);
                    }
                }
            }
            serde_json::from_value(data).map(Self::Private)
        } else {
            serde_json::from_value(data).map(Self::Guild)
        }
    }

    fn is_private(data: &Value) -> bool {
        if let Some(flag) = data.get("is_private").and_then(Value::as_bool) {
            return flag;
        }
        if data.get("recipient").is_some_and(Value::is_object) {
            return true;
        }
        data.get("type")
            .and_then(Value::as_u64)
            .is_some_and(|t| PRIVATE_CHANNEL_TYPES.contains(&t))
    }

    /// Channel id regardless of variant
    #[must_use]
    pub fn id(&self) -> relaycord_core::Snowflake {
        match self {
            Self::Guild(channel) => channel.id,
            Self::Private(channel) => channel.id,
        }
    }
}
