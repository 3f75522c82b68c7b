//! Channel handlers
//!
//! CHANNEL_CREATE and CHANNEL_DELETE carry either kind of channel; the
//! payload is split into guild and private variants before it touches the
//! cache.

use relaycord_core::Channel;
use serde_json::Value;

use super::error::cache_err;
use super::{HandlerError, HandlerResult};
use crate::dispatch::{invoke, Context, EventCallbacks};
use crate::events::{ChannelPayload, GatewayEventType};

/// Handles CHANNEL_CREATE, CHANNEL_UPDATE and CHANNEL_DELETE
pub struct ChannelHandler;

impl ChannelHandler {
    /// Insert the channel; a repeated create replaces the entry
    pub async fn create(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let event = GatewayEventType::ChannelCreate;

        match Self::decode(event, data)? {
            ChannelPayload::Guild(channel) => {
                let inserted = ctx
                    .cache()
                    .upsert_channel(channel.clone())
                    .map_err(cache_err(event))?;
                tracing::debug!(
                    channel_id = %channel.id,
                    name = %channel.name,
                    inserted,
                    "Channel created"
                );
                invoke(callbacks.channel_create.as_ref(), ctx, channel).await;
            }
            ChannelPayload::Private(channel) => {
                ctx.cache().insert_private_channel(channel.clone());
                tracing::debug!(
                    channel_id = %channel.id,
                    recipient_id = %channel.recipient.id,
                    "Private channel created"
                );
                invoke(callbacks.private_channel_create.as_ref(), ctx, channel).await;
            }
        }
        Ok(())
    }

    /// Replace the cached channel with the same id, inserting it if unknown
    pub async fn update(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let event = GatewayEventType::ChannelUpdate;

        match Self::decode(event, data)? {
            ChannelPayload::Guild(channel) => {
                let channel = Self::with_guild_id(&ctx, channel);
                ctx.cache()
                    .upsert_channel(channel.clone())
                    .map_err(cache_err(event))?;
                tracing::debug!(channel_id = %channel.id, name = %channel.name, "Channel updated");
                invoke(callbacks.channel_update.as_ref(), ctx, channel).await;
            }
            ChannelPayload::Private(channel) => {
                ctx.cache().insert_private_channel(channel);
            }
        }
        Ok(())
    }

    /// Remove the channel; the callback fires even if it was never cached
    pub async fn delete(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        match Self::decode(GatewayEventType::ChannelDelete, data)? {
            ChannelPayload::Guild(channel) => {
                let removed = ctx.cache().remove_channel(channel.id);
                if removed.is_none() {
                    tracing::debug!(channel_id = %channel.id, "Deleted channel was not cached");
                }
                invoke(
                    callbacks.channel_delete.as_ref(),
                    ctx,
                    removed.unwrap_or(channel),
                )
                .await;
            }
            ChannelPayload::Private(channel) => {
                let removed = ctx.cache().remove_private_channel(channel.id);
                invoke(
                    callbacks.private_channel_delete.as_ref(),
                    ctx,
                    removed.unwrap_or(channel),
                )
                .await;
            }
        }
        Ok(())
    }

    fn decode(event: GatewayEventType, data: Value) -> HandlerResult<ChannelPayload> {
        ChannelPayload::decode(data).map_err(|source| HandlerError::Decode { event, source })
    }

    /// Updates may omit `guild_id`; recover it from the cached copy
    fn with_guild_id(ctx: &Context, mut channel: Channel) -> Channel {
        if channel.guild_id.is_none() {
            channel.guild_id = ctx.cache().channel(channel.id).and_then(|c| c.guild_id);
        }
        channel
    }
}
