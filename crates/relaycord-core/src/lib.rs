//! # relaycord-core
//!
//! Domain model shared by the gateway client, the state cache and the REST
//! command surface. Every entity decodes directly from gateway payloads.
//! This crate has no dependency on networking or runtime crates.

pub mod entities;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Channel, ChannelKind, Game, Guild, GuildDelete, Member, Message, MessageReference,
    PartialMessage, Presence, PresenceStatus, PrivateChannel, Role, Typing, User,
};
pub use value_objects::{Snowflake, SnowflakeParseError};
