//! Seam between the cache and whatever can open private channels

use async_trait::async_trait;
use relaycord_core::{PrivateChannel, Snowflake};

use crate::error::BoxError;

/// Something able to open a private channel with a user
///
/// Implemented by the REST client; tests substitute counting fakes.
#[async_trait]
pub trait PrivateChannelCreator: Send + Sync {
    async fn create_private_channel(&self, recipient_id: Snowflake)
        -> Result<PrivateChannel, BoxError>;
}
