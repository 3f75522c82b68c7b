//! Gateway events
//!
//! Dispatch tags and the payload wrappers that do not map one-to-one onto a
//! core entity.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{ChannelPayload, ReadyEvent};
