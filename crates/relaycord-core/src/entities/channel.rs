//! Channel entities - guild channels and private one-to-one channels

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entities::User;
use crate::value_objects::Snowflake;

/// Channel kind
///
/// Older gateway versions send the kind as a string ("text", "voice"),
/// newer ones as an integer. Both decode; unrecognised values are kept as
/// `Other` instead of failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelKind {
    #[default]
    Text,
    Voice,
    Category,
    Other(u8),
}

impl ChannelKind {
    /// Get the numeric value used on the wire
    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Text => 0,
            Self::Voice => 2,
            Self::Category => 4,
            Self::Other(n) => n,
        }
    }

    /// Get the name used by string-typed payloads
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Voice => "voice",
            Self::Category => "category",
            Self::Other(_) => "other",
        }
    }
}

impl From<u8> for ChannelKind {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Text,
            2 => Self::Voice,
            4 => Self::Category,
            n => Self::Other(n),
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChannelKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for ChannelKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Null => Ok(Self::default()),
            serde_json::Value::String(s) => match s.as_str() {
                "text" => Ok(Self::Text),
                "voice" => Ok(Self::Voice),
                "category" => Ok(Self::Category),
                _ => Ok(Self::Other(u8::MAX)),
            },
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|v| u8::try_from(v).ok())
                .map(Self::from)
                .ok_or_else(|| D::Error::custom(format!("invalid channel type: {n}"))),
            other => Err(D::Error::custom(format!("invalid channel type: {other}"))),
        }
    }
}

/// Guild channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Snowflake,
    /// Owning guild. Absent in channels nested inside a guild payload; the
    /// cache back-fills it on insertion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(rename = "type", default)]
    pub kind: ChannelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<Snowflake>,
    #[serde(default)]
    pub permission_overwrites: Vec<serde_json::Value>,
}

impl Channel {
    /// Create a new text channel inside a guild
    #[must_use]
    pub fn new_text(id: Snowflake, guild_id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            guild_id: Some(guild_id),
            name: name.into(),
            topic: None,
            position: 0,
            kind: ChannelKind::Text,
            last_message_id: None,
            permission_overwrites: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.kind == ChannelKind::Text
    }

    #[inline]
    #[must_use]
    pub fn is_voice(&self) -> bool {
        self.kind == ChannelKind::Voice
    }

    #[inline]
    #[must_use]
    pub fn is_category(&self) -> bool {
        self.kind == ChannelKind::Category
    }
}

/// Private one-to-one channel, independent of any guild
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivateChannel {
    pub id: Snowflake,
    pub recipient: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<Snowflake>,
}

impl PrivateChannel {
    #[must_use]
    pub fn new(id: Snowflake, recipient: User) -> Self {
        Self {
            id,
            recipient,
            last_message_id: None,
        }
    }

    /// Check whether the remote participant is the given user
    #[inline]
    #[must_use]
    pub fn is_with(&self, user_id: Snowflake) -> bool {
        self.recipient.id == user_id
    }
}
