//! Gateway client
//!
//! The public entry point: build a [`Client`], register callbacks, call
//! [`Client::run`].

mod builder;
mod config;
mod runner;

pub use builder::ClientBuilder;
pub use config::{GatewayConfig, ReconnectPolicy, DEFAULT_EVENT_BUFFER};
pub use runner::Client;
