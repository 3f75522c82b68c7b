//! # relaycord-http
//!
//! Thin REST facade over the platform API. Every call maps to a single
//! request; there is no retry or rate-limit scheduling.
//!
//! ## Example
//!
//! ```ignore
//! use relaycord_http::RestClient;
//!
//! let rest = RestClient::new("https://discordapp.com/api")?;
//! let token = rest.login(&credentials).await?;
//! let rest = rest.with_token(token);
//!
//! let url = rest.gateway_url().await?;
//! rest.send_message(channel_id, "hello").await?;
//! ```

pub mod client;
pub mod error;
pub mod routes;

pub use client::{
    ChannelEdit, InviteInfo, InviteTarget, PrivateChannelOpener, Region, RestClient,
    USER_AGENT,
};
pub use error::{HttpError, HttpResult};
pub use routes::Routes;
