//! READY handler

use relaycord_cache::StateCache;
use serde_json::Value;

use super::error::decode;
use super::HandlerResult;
use crate::events::{GatewayEventType, ReadyEvent};

/// Seeds the cache from the Ready snapshot
pub struct ReadyHandler;

impl ReadyHandler {
    /// Replace the whole cache with the snapshot
    ///
    /// The returned event carries the normalized guilds as stored, so the
    /// Ready callback sees exactly what the cache holds.
    pub fn apply(cache: &StateCache, data: Value) -> HandlerResult<ReadyEvent> {
        let ReadyEvent {
            heartbeat_interval,
            user,
            guilds,
            private_channels,
            session_id,
            v,
        } = decode(GatewayEventType::Ready, data)?;

        cache.replace_all(user.clone(), guilds, private_channels);

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            guilds = cache.guild_count(),
            "Ready received"
        );

        Ok(ReadyEvent {
            heartbeat_interval,
            user,
            guilds: cache.guilds(),
            private_channels: cache.private_channels(),
            session_id,
            v,
        })
    }
}
