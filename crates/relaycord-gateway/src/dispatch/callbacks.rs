//! Event callback registry
//!
//! Applications register async closures per event. Each closure receives a
//! [`Context`] and the decoded payload; its future is awaited on the task
//! spawned for that event.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use relaycord_core::{
    Channel, Guild, GuildDelete, Member, Message, MessageReference, PartialMessage, Presence,
    PrivateChannel, Typing,
};

use super::Context;
use crate::events::ReadyEvent;

/// Type-erased event callback
pub type Callback<T> = Arc<dyn Fn(Context, T) -> BoxFuture<'static, ()> + Send + Sync>;

fn boxed<T, F, Fut>(f: F) -> Callback<T>
where
    F: Fn(Context, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |ctx, payload| f(ctx, payload).boxed())
}

macro_rules! callbacks {
    ($( $(#[$doc:meta])* $setter:ident => $field:ident : $payload:ty ),* $(,)?) => {
        /// Callbacks invoked for dispatch events
        ///
        /// Unset callbacks are skipped; the cache is still updated.
        #[derive(Clone, Default)]
        pub struct EventCallbacks {
            $( pub(crate) $field: Option<Callback<$payload>>, )*
        }

        impl EventCallbacks {
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            $(
                $(#[$doc])*
                #[must_use]
                pub fn $setter<F, Fut>(mut self, f: F) -> Self
                where
                    F: Fn(Context, $payload) -> Fut + Send + Sync + 'static,
                    Fut: Future<Output = ()> + Send + 'static,
                {
                    self.$field = Some(boxed(f));
                    self
                }
            )*

            /// Number of registered callbacks
            #[must_use]
            pub fn registered(&self) -> usize {
                [$( self.$field.is_some(), )*].into_iter().filter(|set| *set).count()
            }
        }
    };
}

callbacks! {
    /// Ready was applied to the cache and the heartbeat is running
    on_ready => ready: ReadyEvent,
    /// A message from someone other than the current user
    on_message_create => message_create: Message,
    on_message_update => message_update: PartialMessage,
    on_message_delete => message_delete: MessageReference,
    on_message_ack => message_ack: MessageReference,
    on_typing_start => typing_start: Typing,
    on_presence_update => presence_update: Presence,
    on_channel_create => channel_create: Channel,
    on_channel_update => channel_update: Channel,
    /// Fires even when the channel was not cached
    on_channel_delete => channel_delete: Channel,
    on_private_channel_create => private_channel_create: PrivateChannel,
    on_private_channel_delete => private_channel_delete: PrivateChannel,
    on_guild_create => guild_create: Guild,
    on_guild_delete => guild_delete: GuildDelete,
    on_member_add => member_add: Member,
    on_member_remove => member_remove: Member,
}

impl std::fmt::Debug for EventCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventCallbacks")
            .field("registered", &self.registered())
            .finish_non_exhaustive()
    }
}

/// Run a callback if one is registered
pub(crate) async fn invoke<T>(callback: Option<&Callback<T>>, ctx: Context, payload: T) {
    if let Some(callback) = callback {
        callback(ctx, payload).await;
    }
}
