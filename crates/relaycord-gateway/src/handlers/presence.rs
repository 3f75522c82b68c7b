//! Presence Update handler

use relaycord_cache::CacheError;
use relaycord_core::Presence;
use serde_json::Value;

use super::error::{cache_err, decode};
use super::HandlerResult;
use crate::dispatch::{invoke, Context, EventCallbacks};
use crate::events::GatewayEventType;

/// Handles PRESENCE_UPDATE
pub struct PresenceHandler;

impl PresenceHandler {
    /// Record the presence in its guild and forward it
    ///
    /// Presences without a guild, or for a guild that is not cached, skip the
    /// cache but still reach the callback.
    pub async fn handle(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let event = GatewayEventType::PresenceUpdate;
        let presence: Presence = decode(event, data)?;

        match presence.guild_id {
            Some(guild_id) => match ctx.cache().upsert_presence(guild_id, presence.clone()) {
                Ok(_) => {
                    tracing::trace!(
                        guild_id = %guild_id,
                        user_id = %presence.user_id(),
                        status = %presence.status,
                        "Presence updated"
                    );
                }
                Err(CacheError::GuildNotFound(_)) => {
                    tracing::debug!(guild_id = %guild_id, "Presence for uncached guild");
                }
                Err(e) => return Err(cache_err(event)(e)),
            },
            None => {
                tracing::trace!(user_id = %presence.user_id(), "Presence without guild");
            }
        }

        invoke(callbacks.presence_update.as_ref(), ctx, presence).await;
        Ok(())
    }
}
