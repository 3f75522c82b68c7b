//! REST endpoint paths

use relaycord_core::Snowflake;

/// Builds absolute endpoint URLs under an API base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    base: String,
}

impl Routes {
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn login(&self) -> String {
        format!("{}/auth/login", self.base)
    }

    pub fn gateway(&self) -> String {
        format!("{}/gateway", self.base)
    }

    pub fn user_channels(&self, user_id: Snowflake) -> String {
        format!("{}/users/{}/channels", self.base, user_id)
    }

    pub fn channel(&self, channel_id: Snowflake) -> String {
        format!("{}/channels/{}", self.base, channel_id)
    }

    pub fn channel_messages(&self, channel_id: Snowflake) -> String {
        format!("{}/channels/{}/messages", self.base, channel_id)
    }

    pub fn channel_message(&self, channel_id: Snowflake, message_id: Snowflake) -> String {
        format!("{}/channels/{}/messages/{}", self.base, channel_id, message_id)
    }

    pub fn message_ack(&self, channel_id: Snowflake, message_id: Snowflake) -> String {
        format!(
            "{}/channels/{}/messages/{}/ack",
            self.base, channel_id, message_id
        )
    }

    pub fn guild_channels(&self, guild_id: Snowflake) -> String {
        format!("{}/guilds/{}/channels", self.base, guild_id)
    }

    pub fn guild_ban(&self, guild_id: Snowflake, user_id: Snowflake) -> String {
        format!("{}/guilds/{}/bans/{}", self.base, guild_id, user_id)
    }

    pub fn guild_member(&self, guild_id: Snowflake, user_id: Snowflake) -> String {
        format!("{}/guilds/{}/members/{}", self.base, guild_id, user_id)
    }

    pub fn invite(&self, code: &str) -> String {
        format!("{}/invite/{}", self.base, code)
    }

    pub fn voice_regions(&self) -> String {
        format!("{}/voice/regions", self.base)
    }
}
