//! REST client
//!
//! One method per command. Requests carry the raw token in the
//! `Authorization` header and a fixed user agent.

use std::time::Duration;

use async_trait::async_trait;
use relaycord_cache::{BoxError, PrivateChannelCreator};
use relaycord_common::Credentials;
use relaycord_core::{Channel, ChannelKind, Guild, Message, PrivateChannel, Snowflake};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{HttpError, HttpResult};
use crate::routes::Routes;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("DiscordBot (relaycord, ", env!("CARGO_PKG_VERSION"), ")");

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fields to change on a channel; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChannelEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

/// Result of accepting an invite
#[derive(Debug, Clone, Deserialize)]
pub struct InviteInfo {
    pub code: String,
    #[serde(default)]
    pub guild: Option<InviteTarget>,
    #[serde(default)]
    pub channel: Option<InviteTarget>,
}

/// Guild or channel an invite points at
#[derive(Debug, Clone, Deserialize)]
pub struct InviteTarget {
    pub id: Snowflake,
    #[serde(default)]
    pub name: String,
}

/// Voice region as listed by the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Region {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sample_hostname: Option<String>,
    #[serde(default)]
    pub sample_port: Option<u16>,
    #[serde(default)]
    pub vip: bool,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct GatewayResponse {
    url: String,
}

/// REST client
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    routes: Routes,
    token: Option<String>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base", &self.routes.base())
            .field("authorized", &self.token.is_some())
            .finish()
    }
}

impl RestClient {
    /// Create an unauthenticated client for the given API base
    pub fn new(api_base: impl Into<String>) -> HttpResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            routes: Routes::new(api_base),
            token: None,
        })
    }

    /// Attach a token; every later request is authorized with it
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Exchange email and password for a token
    pub async fn login(&self, credentials: &Credentials) -> HttpResult<String> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let response: LoginResponse = self
            .send(self.http.post(self.routes.login()).json(&body))
            .await?;

        tracing::info!(email = %credentials.email, "Logged in");
        Ok(response.token)
    }

    /// Ask the API which gateway URL to connect to
    pub async fn gateway_url(&self) -> HttpResult<String> {
        let response: GatewayResponse = self
            .send(self.authorized(self.http.get(self.routes.gateway()))?)
            .await?;
        Ok(response.url)
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub async fn send_message(&self, channel_id: Snowflake, content: &str) -> HttpResult<Message> {
        let body = json!({ "content": content, "tts": false });
        self.send(
            self.authorized(self.http.post(self.routes.channel_messages(channel_id)))?
                .json(&body),
        )
        .await
    }

    /// Send a message that notifies the given users
    pub async fn send_message_with_mentions(
        &self,
        channel_id: Snowflake,
        content: &str,
        mentions: &[Snowflake],
    ) -> HttpResult<Message> {
        let body = json!({ "content": content, "mentions": mentions, "tts": false });
        self.send(
            self.authorized(self.http.post(self.routes.channel_messages(channel_id)))?
                .json(&body),
        )
        .await
    }

    pub async fn edit_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        content: &str,
    ) -> HttpResult<Message> {
        let body = json!({ "content": content });
        self.send(
            self.authorized(
                self.http
                    .patch(self.routes.channel_message(channel_id, message_id)),
            )?
            .json(&body),
        )
        .await
    }

    pub async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> HttpResult<()> {
        self.send_empty(self.authorized(
            self.http
                .delete(self.routes.channel_message(channel_id, message_id)),
        )?)
        .await
    }

    /// Mark a message as read
    pub async fn ack_message(&self, channel_id: Snowflake, message_id: Snowflake) -> HttpResult<()> {
        self.send_empty(
            self.authorized(self.http.post(self.routes.message_ack(channel_id, message_id)))?
                .json(&json!({})),
        )
        .await
    }

    // ========================================================================
    // Channels
    // ========================================================================

    pub async fn create_channel(
        &self,
        guild_id: Snowflake,
        name: &str,
        kind: ChannelKind,
    ) -> HttpResult<Channel> {
        let body = json!({ "name": name, "type": kind.as_str() });
        self.send(
            self.authorized(self.http.post(self.routes.guild_channels(guild_id)))?
                .json(&body),
        )
        .await
    }

    pub async fn edit_channel(&self, channel_id: Snowflake, edit: &ChannelEdit) -> HttpResult<Channel> {
        self.send(
            self.authorized(self.http.patch(self.routes.channel(channel_id)))?
                .json(edit),
        )
        .await
    }

    /// Open a private channel between `me` and `recipient_id`
    pub async fn create_private_channel(
        &self,
        me: Snowflake,
        recipient_id: Snowflake,
    ) -> HttpResult<PrivateChannel> {
        let body = json!({ "recipient_id": recipient_id });
        self.send(
            self.authorized(self.http.post(self.routes.user_channels(me)))?
                .json(&body),
        )
        .await
    }

    /// Borrow this client as a private channel creator acting for `me`
    pub fn private_channels_for(&self, me: Snowflake) -> PrivateChannelOpener<'_> {
        PrivateChannelOpener { rest: self, me }
    }

    // ========================================================================
    // Voice Regions
    // ========================================================================

    pub async fn regions(&self) -> HttpResult<Vec<Region>> {
        self.send(self.authorized(self.http.get(self.routes.voice_regions()))?)
            .await
    }

    /// Look up the region a guild is hosted in
    ///
    /// `None` when the guild has no region or the API does not list it.
    pub async fn guild_region(&self, guild: &Guild) -> HttpResult<Option<Region>> {
        let Some(wanted) = guild.region.as_deref() else {
            return Ok(None);
        };
        let region = self
            .regions()
            .await?
            .into_iter()
            .find(|region| region.id == wanted);
        if region.is_none() {
            tracing::debug!(guild_id = %guild.id, region = wanted, "Guild region not listed");
        }
        Ok(region)
    }

    // ========================================================================
    // Moderation
    // ========================================================================

    pub async fn ban(&self, guild_id: Snowflake, user_id: Snowflake, delete_message_days: u8) -> HttpResult<()> {
        self.send_empty(
            self.authorized(self.http.put(self.routes.guild_ban(guild_id, user_id)))?
                .query(&[("delete-message-days", delete_message_days)]),
        )
        .await
    }

    pub async fn unban(&self, guild_id: Snowflake, user_id: Snowflake) -> HttpResult<()> {
        self.send_empty(self.authorized(self.http.delete(self.routes.guild_ban(guild_id, user_id)))?)
            .await
    }

    pub async fn kick(&self, guild_id: Snowflake, user_id: Snowflake) -> HttpResult<()> {
        self.send_empty(
            self.authorized(self.http.delete(self.routes.guild_member(guild_id, user_id)))?,
        )
        .await
    }

    pub async fn accept_invite(&self, code: &str) -> HttpResult<InviteInfo> {
        self.send(self.authorized(self.http.post(self.routes.invite(code)))?.json(&json!({})))
            .await
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    fn authorized(&self, request: RequestBuilder) -> HttpResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or(HttpError::MissingToken)?;
        Ok(request.header(reqwest::header::AUTHORIZATION, token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> HttpResult<T> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> HttpResult<()> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder) -> HttpResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "REST request rejected");
            return Err(HttpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(url = %url, status = status.as_u16(), "REST request completed");
        Ok(body)
    }
}

/// [`PrivateChannelCreator`] backed by the REST client
#[derive(Debug, Clone, Copy)]
pub struct PrivateChannelOpener<'a> {
    rest: &'a RestClient,
    me: Snowflake,
}

#[async_trait]
impl PrivateChannelCreator for PrivateChannelOpener<'_> {
    async fn create_private_channel(&self, recipient_id: Snowflake) -> Result<PrivateChannel, BoxError> {
        Ok(self.rest.create_private_channel(self.me, recipient_id).await?)
    }
}
