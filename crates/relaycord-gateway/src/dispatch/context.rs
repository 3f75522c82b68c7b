//! Callback context
//!
//! Handle given to every callback: read access to the cache, the REST
//! client, and the outbound half of the live gateway connection.

use relaycord_cache::{CacheError, SharedStateCache};
use relaycord_core::{Message, PrivateChannel, Snowflake, User};
use relaycord_http::{HttpError, RestClient};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::protocol::{GatewayMessage, StatusUpdatePayload};

/// Errors from context operations
#[derive(Debug, Error)]
pub enum ContextError {
    /// The connection this context belongs to is gone
    #[error("Gateway connection is closed")]
    NotConnected,

    #[error("No REST client configured")]
    NoRestClient,

    /// Ready has not been received yet, so the current user is unknown
    #[error("Current user not known yet")]
    NotReady,

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Http(#[from] HttpError),
}

/// Per-connection handle passed to callbacks
#[derive(Debug, Clone)]
pub struct Context {
    cache: SharedStateCache,
    http: Option<RestClient>,
    outbound: mpsc::Sender<GatewayMessage>,
}

impl Context {
    #[must_use]
    pub fn new(
        cache: SharedStateCache,
        http: Option<RestClient>,
        outbound: mpsc::Sender<GatewayMessage>,
    ) -> Self {
        Self {
            cache,
            http,
            outbound,
        }
    }

    pub fn cache(&self) -> &SharedStateCache {
        &self.cache
    }

    pub fn http(&self) -> Option<&RestClient> {
        self.http.as_ref()
    }

    pub fn current_user(&self) -> Option<User> {
        self.cache.current_user()
    }

    /// Set or clear the "playing" status of the current user
    pub async fn set_playing(&self, game: Option<&str>) -> Result<(), ContextError> {
        let frame = GatewayMessage::status_update(StatusUpdatePayload::playing(game))?;
        self.outbound
            .send(frame)
            .await
            .map_err(|_| ContextError::NotConnected)
    }

    /// Send a text message through the REST client
    pub async fn send_message(
        &self,
        channel_id: Snowflake,
        content: &str,
    ) -> Result<Message, ContextError> {
        let http = self.http.as_ref().ok_or(ContextError::NoRestClient)?;
        Ok(http.send_message(channel_id, content).await?)
    }

    /// Private channel with `user_id`, opened through REST on a cache miss
    pub async fn private_channel(&self, user_id: Snowflake) -> Result<PrivateChannel, ContextError> {
        if let Some(existing) = self.cache.private_channel_for(user_id) {
            return Ok(existing);
        }

        let me = self.cache.current_user().ok_or(ContextError::NotReady)?;
        let http = self.http.as_ref().ok_or(ContextError::NoRestClient)?;
        let opener = http.private_channels_for(me.id);

        Ok(self
            .cache
            .get_or_create_private_channel(user_id, &opener)
            .await?)
    }
}
