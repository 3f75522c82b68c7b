//! Guild handlers

use relaycord_core::{Guild, GuildDelete};
use serde_json::Value;

use super::error::decode;
use super::HandlerResult;
use crate::dispatch::{invoke, Context, EventCallbacks};
use crate::events::GatewayEventType;

/// Handles GUILD_CREATE and GUILD_DELETE
pub struct GuildHandler;

impl GuildHandler {
    /// Insert or replace the whole guild aggregate
    pub async fn create(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let mut guild: Guild = decode(GatewayEventType::GuildCreate, data)?;
        guild.normalize();

        let inserted = ctx.cache().insert_guild(guild.clone());
        tracing::debug!(
            guild_id = %guild.id,
            name = %guild.name,
            channels = guild.channels.len(),
            members = guild.members.len(),
            inserted,
            "Guild created"
        );

        invoke(callbacks.guild_create.as_ref(), ctx, guild).await;
        Ok(())
    }

    pub async fn delete(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let deleted: GuildDelete = decode(GatewayEventType::GuildDelete, data)?;

        if ctx.cache().remove_guild(deleted.id).is_none() {
            tracing::debug!(guild_id = %deleted.id, "Deleted guild was not cached");
        } else {
            tracing::debug!(
                guild_id = %deleted.id,
                unavailable = deleted.unavailable,
                "Guild removed"
            );
        }

        invoke(callbacks.guild_delete.as_ref(), ctx, deleted).await;
        Ok(())
    }
}
