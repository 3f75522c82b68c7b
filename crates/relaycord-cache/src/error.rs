//! Cache error types
//!
//! Lookups never fail, they return `None`. Only mutations that would break
//! an aggregate invariant and the get-or-create path produce errors.

use relaycord_core::Snowflake;

/// Boxed error returned by collaborators such as the REST client
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// State cache errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Guild not found in cache: {0}")]
    GuildNotFound(Snowflake),

    #[error("Channel {0} carries no guild id")]
    MissingGuildId(Snowflake),

    #[error("Failed to create private channel: {0}")]
    PrivateChannelCreation(#[source] BoxError),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
