//! Guild member handlers

use relaycord_core::Member;
use serde_json::Value;

use super::error::{cache_err, decode};
use super::{HandlerError, HandlerResult};
use crate::dispatch::{invoke, Context, EventCallbacks};
use crate::events::GatewayEventType;

/// Handles GUILD_MEMBER_ADD and GUILD_MEMBER_REMOVE
pub struct MemberHandler;

impl MemberHandler {
    pub async fn add(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let event = GatewayEventType::GuildMemberAdd;
        let member: Member = decode(event, data)?;
        let guild_id = member
            .guild_id
            .ok_or(HandlerError::MissingField { event, field: "guild_id" })?;

        let inserted = ctx
            .cache()
            .upsert_member(guild_id, member.clone())
            .map_err(cache_err(event))?;
        tracing::debug!(
            guild_id = %guild_id,
            user_id = %member.user_id(),
            inserted,
            "Member added"
        );

        invoke(callbacks.member_add.as_ref(), ctx, member).await;
        Ok(())
    }

    /// Remove by user id; the callback gets the cached entry when there was one
    pub async fn remove(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let event = GatewayEventType::GuildMemberRemove;
        let member: Member = decode(event, data)?;
        let guild_id = member
            .guild_id
            .ok_or(HandlerError::MissingField { event, field: "guild_id" })?;

        let removed = ctx
            .cache()
            .remove_member(guild_id, member.user_id())
            .map_err(cache_err(event))?;
        tracing::debug!(
            guild_id = %guild_id,
            user_id = %member.user_id(),
            cached = removed.is_some(),
            "Member removed"
        );

        invoke(callbacks.member_remove.as_ref(), ctx, removed.unwrap_or(member)).await;
        Ok(())
    }
}
