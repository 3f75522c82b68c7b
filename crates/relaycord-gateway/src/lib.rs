//! # relaycord-gateway
//!
//! Gateway client for a Discord-style real-time API.
//!
//! ## Features
//!
//! - **Handshake & liveness**: identify on connect, heartbeat once Ready has
//!   been applied, answer server heartbeat requests
//! - **Event dispatch**: two-stage decoding, cache updates, per-event
//!   callbacks on their own tasks
//! - **Reconnect policy**: off by default; optional delay and attempt cap
//!
//! ## Example
//!
//! ```ignore
//! use relaycord_gateway::{Client, EventCallbacks};
//!
//! let callbacks = EventCallbacks::new().on_message_create(|ctx, message| async move {
//!     if message.content == "!ping" {
//!         let _ = ctx.send_message(message.channel_id, "pong").await;
//!     }
//! });
//!
//! let client = Client::builder(token).http(rest).callbacks(callbacks).build();
//! client.run().await?;
//! ```

pub mod client;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod handlers;
pub mod protocol;

pub use client::{Client, ClientBuilder, GatewayConfig, ReconnectPolicy};
pub use connection::{
    ConnectionState, Connector, FrameSink, FrameStream, TransportError, TransportLink,
    WebSocketConnector,
};
pub use dispatch::{Context, ContextError, EventCallbacks};
pub use error::{GatewayError, GatewayResult};
pub use events::{ChannelPayload, GatewayEventType, ReadyEvent};
pub use protocol::{CloseAction, CloseCode, GatewayMessage, IdentifyProperties, OpCode};
