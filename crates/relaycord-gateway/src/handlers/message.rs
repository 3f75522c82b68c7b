//! Message handlers
//!
//! Messages are never cached; these handlers only decode and forward.

use relaycord_core::{MessageReference, Snowflake, Typing};
use serde_json::Value;

use super::error::decode;
use super::HandlerResult;
use crate::dispatch::{invoke, Context, EventCallbacks};
use crate::events::GatewayEventType;

/// Handles MESSAGE_* and TYPING_START
pub struct MessageHandler;

impl MessageHandler {
    pub async fn create(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let message: relaycord_core::Message = decode(GatewayEventType::MessageCreate, data)?;

        if Self::is_self(&ctx, message.author.id) {
            tracing::trace!(message_id = %message.id, "Ignoring own message");
            return Ok(());
        }

        invoke(callbacks.message_create.as_ref(), ctx, message).await;
        Ok(())
    }

    /// Updates without an author (embed-only edits) are always forwarded
    pub async fn update(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let message: relaycord_core::PartialMessage = decode(GatewayEventType::MessageUpdate, data)?;

        if message
            .author
            .as_ref()
            .is_some_and(|author| Self::is_self(&ctx, author.id))
        {
            tracing::trace!(message_id = %message.id, "Ignoring own message edit");
            return Ok(());
        }

        invoke(callbacks.message_update.as_ref(), ctx, message).await;
        Ok(())
    }

    pub async fn delete(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let reference: MessageReference = decode(GatewayEventType::MessageDelete, data)?;
        invoke(callbacks.message_delete.as_ref(), ctx, reference).await;
        Ok(())
    }

    pub async fn ack(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let reference: MessageReference = decode(GatewayEventType::MessageAck, data)?;
        invoke(callbacks.message_ack.as_ref(), ctx, reference).await;
        Ok(())
    }

    pub async fn typing(ctx: Context, callbacks: &EventCallbacks, data: Value) -> HandlerResult<()> {
        let typing: Typing = decode(GatewayEventType::TypingStart, data)?;
        invoke(callbacks.typing_start.as_ref(), ctx, typing).await;
        Ok(())
    }

    fn is_self(ctx: &Context, author_id: Snowflake) -> bool {
        ctx.current_user().is_some_and(|me| me.id == author_id)
    }
}
