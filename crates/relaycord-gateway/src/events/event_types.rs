//! Gateway event types
//!
//! Event names carried in the `t` field of dispatch frames.

use std::fmt;

/// Dispatch event tags this client understands
///
/// Tags outside this set are ignored by the receive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    // Connection events
    /// Bulk snapshot sent after Identify
    Ready,

    // Message events
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    /// A message was marked as read
    MessageAck,
    TypingStart,

    // Presence events
    PresenceUpdate,

    // Channel events (guild and private)
    ChannelCreate,
    ChannelUpdate,
    ChannelDelete,

    // Guild events
    GuildCreate,
    GuildDelete,

    // Member events
    GuildMemberAdd,
    GuildMemberRemove,
}

impl GatewayEventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::MessageUpdate => "MESSAGE_UPDATE",
            Self::MessageDelete => "MESSAGE_DELETE",
            Self::MessageAck => "MESSAGE_ACK",
            Self::TypingStart => "TYPING_START",
            Self::PresenceUpdate => "PRESENCE_UPDATE",
            Self::ChannelCreate => "CHANNEL_CREATE",
            Self::ChannelUpdate => "CHANNEL_UPDATE",
            Self::ChannelDelete => "CHANNEL_DELETE",
            Self::GuildCreate => "GUILD_CREATE",
            Self::GuildDelete => "GUILD_DELETE",
            Self::GuildMemberAdd => "GUILD_MEMBER_ADD",
            Self::GuildMemberRemove => "GUILD_MEMBER_REMOVE",
        }
    }

    /// Parse an event type from a string
    ///
    /// `GUILD_MEMBER_DELETE` is accepted as an alias of `GUILD_MEMBER_REMOVE`.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "READY" => Some(Self::Ready),
            "MESSAGE_CREATE" => Some(Self::MessageCreate),
            "MESSAGE_UPDATE" => Some(Self::MessageUpdate),
            "MESSAGE_DELETE" => Some(Self::MessageDelete),
            "MESSAGE_ACK" => Some(Self::MessageAck),
            "TYPING_START" => Some(Self::TypingStart),
            "PRESENCE_UPDATE" => Some(Self::PresenceUpdate),
            "CHANNEL_CREATE" => Some(Self::ChannelCreate),
            "CHANNEL_UPDATE" => Some(Self::ChannelUpdate),
            "CHANNEL_DELETE" => Some(Self::ChannelDelete),
            "GUILD_CREATE" => Some(Self::GuildCreate),
            "GUILD_DELETE" => Some(Self::GuildDelete),
            "GUILD_MEMBER_ADD" => Some(Self::GuildMemberAdd),
            "GUILD_MEMBER_REMOVE" | "GUILD_MEMBER_DELETE" => Some(Self::GuildMemberRemove),
            _ => None,
        }
    }

    /// Check if handling this event writes to the cache
    #[must_use]
    pub const fn mutates_cache(self) -> bool {
        !matches!(
            self,
            Self::MessageCreate
                | Self::MessageUpdate
                | Self::MessageDelete
                | Self::MessageAck
                | Self::TypingStart
        )
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
