//! Dispatch event handlers
//!
//! One handler per event family. Handlers apply the cache effect first and
//! then invoke the matching callback, so a callback always observes its own
//! event in the cache.

mod channel;
mod error;
mod guild;
mod member;
mod message;
mod presence;
mod ready;

pub use channel::ChannelHandler;
pub use error::{HandlerError, HandlerResult};
pub use guild::GuildHandler;
pub use member::MemberHandler;
pub use message::MessageHandler;
pub use presence::PresenceHandler;
pub use ready::ReadyHandler;

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::dispatch::{invoke, Context, EventCallbacks};
use crate::events::GatewayEventType;

/// Routes decoded dispatch events to their handler
pub struct EventRouter;

impl EventRouter {
    /// Handle one dispatch event to completion
    pub async fn route(
        ctx: Context,
        callbacks: &EventCallbacks,
        event: GatewayEventType,
        data: Value,
    ) -> HandlerResult<()> {
        match event {
            GatewayEventType::Ready => {
                let ready = ReadyHandler::apply(ctx.cache(), data)?;
                invoke(callbacks.ready.as_ref(), ctx, ready).await;
                Ok(())
            }
            GatewayEventType::MessageCreate => MessageHandler::create(ctx, callbacks, data).await,
            GatewayEventType::MessageUpdate => MessageHandler::update(ctx, callbacks, data).await,
            GatewayEventType::MessageDelete => MessageHandler::delete(ctx, callbacks, data).await,
            GatewayEventType::MessageAck => MessageHandler::ack(ctx, callbacks, data).await,
            GatewayEventType::TypingStart => MessageHandler::typing(ctx, callbacks, data).await,
            GatewayEventType::PresenceUpdate => PresenceHandler::handle(ctx, callbacks, data).await,
            GatewayEventType::ChannelCreate => ChannelHandler::create(ctx, callbacks, data).await,
            GatewayEventType::ChannelUpdate => ChannelHandler::update(ctx, callbacks, data).await,
            GatewayEventType::ChannelDelete => ChannelHandler::delete(ctx, callbacks, data).await,
            GatewayEventType::GuildCreate => GuildHandler::create(ctx, callbacks, data).await,
            GatewayEventType::GuildDelete => GuildHandler::delete(ctx, callbacks, data).await,
            GatewayEventType::GuildMemberAdd => MemberHandler::add(ctx, callbacks, data).await,
            GatewayEventType::GuildMemberRemove => MemberHandler::remove(ctx, callbacks, data).await,
        }
    }

    /// Handle one dispatch event on its own task
    ///
    /// Failures are logged and the event is dropped.
    pub fn spawn(
        ctx: Context,
        callbacks: Arc<EventCallbacks>,
        event: GatewayEventType,
        data: Value,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = Self::route(ctx, &callbacks, event, data).await {
                tracing::warn!(event = %e.event(), error = %e, "Dropped gateway event");
            }
        })
    }
}
