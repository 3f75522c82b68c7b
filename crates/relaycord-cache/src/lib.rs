//! # relaycord-cache
//!
//! In-memory mirror of the remote state seen through the gateway.
//!
//! ## Features
//!
//! - **State Cache**: guilds with their channels, members and presences, plus
//!   private channels and the authenticated user, behind one coarse lock
//! - **Get-or-create**: private channel lookup that issues at most one
//!   creation request per recipient
//!
//! ## Example
//!
//! ```ignore
//! use relaycord_cache::StateCache;
//!
//! let cache = StateCache::new();
//! cache.replace_all(ready.user, ready.guilds, ready.private_channels);
//!
//! if let Some(channel) = cache.channel(channel_id) {
//!     tracing::info!(name = %channel.name, "found channel");
//! }
//!
//! let dm = cache.get_or_create_private_channel(user_id, &rest_client).await?;
//! ```

pub mod error;
pub mod store;

pub use error::{BoxError, CacheError, CacheResult};
pub use store::{PrivateChannelCreator, SharedStateCache, StateCache};
