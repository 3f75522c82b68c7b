//! Guild entity - the server aggregate
//!
//! A guild owns its roles, channels, members and presences. The mutating
//! helpers below keep the aggregate free of duplicates: at most one channel
//! per channel id, one member and one presence per user id.

use serde::{Deserialize, Serialize};

use crate::entities::{Channel, Member, Presence, Role};
use crate::value_objects::Snowflake;

/// Guild (server) aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guild {
    pub id: Snowflake,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afk_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afk_channel_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
    #[serde(default)]
    pub large: bool,
    /// Set while the guild is in an outage; such guilds carry only an id
    #[serde(default)]
    pub unavailable: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub presences: Vec<Presence>,
}

impl Guild {
    /// Create an empty guild
    #[must_use]
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            owner_id: None,
            region: None,
            icon: None,
            afk_timeout: None,
            afk_channel_id: None,
            joined_at: None,
            large: false,
            unavailable: false,
            roles: Vec::new(),
            channels: Vec::new(),
            members: Vec::new(),
            presences: Vec::new(),
        }
    }

    /// Check if a user is the guild owner
    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == Some(user_id)
    }

    /// Get the guild icon URL relative to the given API base
    pub fn icon_url(&self, api_base: &str) -> Option<String> {
        self.icon.as_ref().map(|hash| {
            format!(
                "{}/guilds/{}/icons/{}.jpg",
                api_base.trim_end_matches('/'),
                self.id,
                hash
            )
        })
    }

    /// Bring a freshly decoded guild into its cached shape
    ///
    /// Channels nested in guild payloads carry no guild id; this fills it
    /// in and drops duplicate entries, keeping the last occurrence.
    pub fn normalize(&mut self) {
        let guild_id = self.id;
        for channel in &mut self.channels {
            channel.guild_id = Some(guild_id);
        }
        for member in &mut self.members {
            member.guild_id = Some(guild_id);
        }
        for presence in &mut self.presences {
            presence.guild_id = Some(guild_id);
        }

        dedup_last_by_key(&mut self.channels, |c| c.id);
        dedup_last_by_key(&mut self.members, Member::user_id);
        dedup_last_by_key(&mut self.presences, Presence::user_id);
        dedup_last_by_key(&mut self.roles, |r| r.id);
    }

    // ========================================================================
    // Channels
    // ========================================================================

    pub fn channel(&self, channel_id: Snowflake) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == channel_id)
    }

    /// Find a channel by exact name
    pub fn channel_by_name(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Insert a channel or replace the one with the same id in place
    ///
    /// Returns `true` if the channel was not present before.
    pub fn upsert_channel(&mut self, mut channel: Channel) -> bool {
        channel.guild_id = Some(self.id);
        match self.channels.iter_mut().find(|c| c.id == channel.id) {
            Some(existing) => {
                *existing = channel;
                false
            }
            None => {
                self.channels.push(channel);
                true
            }
        }
    }

    pub fn remove_channel(&mut self, channel_id: Snowflake) -> Option<Channel> {
        let index = self.channels.iter().position(|c| c.id == channel_id)?;
        Some(self.channels.remove(index))
    }

    // ========================================================================
    // Members
    // ========================================================================

    pub fn member(&self, user_id: Snowflake) -> Option<&Member> {
        self.members.iter().find(|m| m.user_id() == user_id)
    }

    /// Find a member by exact username
    pub fn member_by_name(&self, username: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.user.username == username)
    }

    /// Insert a member or replace the existing entry for the same user
    ///
    /// Returns `true` if the member was not present before.
    pub fn upsert_member(&mut self, mut member: Member) -> bool {
        member.guild_id = Some(self.id);
        match self
            .members
            .iter_mut()
            .find(|m| m.user_id() == member.user_id())
        {
            Some(existing) => {
                *existing = member;
                false
            }
            None => {
                self.members.push(member);
                true
            }
        }
    }

    pub fn remove_member(&mut self, user_id: Snowflake) -> Option<Member> {
        let index = self.members.iter().position(|m| m.user_id() == user_id)?;
        Some(self.members.remove(index))
    }

    // ========================================================================
    // Presences
    // ========================================================================

    pub fn presence(&self, user_id: Snowflake) -> Option<&Presence> {
        self.presences.iter().find(|p| p.user_id() == user_id)
    }

    /// Insert a presence or replace the existing one for the same user
    pub fn upsert_presence(&mut self, mut presence: Presence) -> bool {
        presence.guild_id = Some(self.id);
        match self
            .presences
            .iter_mut()
            .find(|p| p.user_id() == presence.user_id())
        {
            Some(existing) => {
                *existing = presence;
                false
            }
            None => {
                self.presences.push(presence);
                true
            }
        }
    }

    pub fn role(&self, role_id: Snowflake) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == role_id)
    }
}

/// GUILD_DELETE payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildDelete {
    pub id: Snowflake,
    /// `true` when the guild went into an outage rather than being left
    #[serde(default)]
    pub unavailable: bool,
}

fn dedup_last_by_key<T, K, F>(items: &mut Vec<T>, key: F)
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        let k = key(&item);
        match kept.iter_mut().find(|existing| key(existing) == k) {
            Some(slot) => *slot = item,
            None => kept.push(item),
        }
    }
    *items = kept;
}
