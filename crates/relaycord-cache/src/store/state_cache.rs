//! In-memory state cache.
//!
//! One coarse `RwLock` guards the whole mirror. Every accessor clones what it
//! returns so no lock is ever held by a caller, and in particular never
//! across an `.await`.

use std::sync::Arc;

use parking_lot::RwLock;
use relaycord_core::{Channel, Guild, Member, Presence, PrivateChannel, Snowflake, User};
use tokio::sync::Mutex;

use crate::error::{CacheError, CacheResult};
use crate::store::PrivateChannelCreator;

/// Shared handle to the cache
pub type SharedStateCache = Arc<StateCache>;

#[derive(Debug, Default)]
struct CacheState {
    current_user: Option<User>,
    guilds: Vec<Guild>,
    private_channels: Vec<PrivateChannel>,
}

impl CacheState {
    fn guild(&self, guild_id: Snowflake) -> Option<&Guild> {
        self.guilds.iter().find(|g| g.id == guild_id)
    }

    fn guild_mut(&mut self, guild_id: Snowflake) -> CacheResult<&mut Guild> {
        self.guilds
            .iter_mut()
            .find(|g| g.id == guild_id)
            .ok_or(CacheError::GuildNotFound(guild_id))
    }
}

/// Authoritative local mirror of gateway state
///
/// Empty until the first Ready event seeds it. Only the gateway handlers
/// mutate it; application code reads through the lookup methods.
#[derive(Debug, Default)]
pub struct StateCache {
    state: RwLock<CacheState>,
    /// Serializes get-or-create so concurrent misses issue one request
    private_channel_lock: Mutex<()>,
}

impl StateCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> SharedStateCache {
        Arc::new(Self::new())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// The authenticated user, once Ready has been applied
    pub fn current_user(&self) -> Option<User> {
        self.state.read().current_user.clone()
    }

    pub fn guild(&self, guild_id: Snowflake) -> Option<Guild> {
        self.state.read().guild(guild_id).cloned()
    }

    /// First guild whose name matches exactly
    pub fn guild_by_name(&self, name: &str) -> Option<Guild> {
        self.state
            .read()
            .guilds
            .iter()
            .find(|g| g.name == name)
            .cloned()
    }

    pub fn guilds(&self) -> Vec<Guild> {
        self.state.read().guilds.clone()
    }

    pub fn guild_count(&self) -> usize {
        self.state.read().guilds.len()
    }

    /// Find a guild channel by id, searching every guild
    pub fn channel(&self, channel_id: Snowflake) -> Option<Channel> {
        self.state
            .read()
            .guilds
            .iter()
            .find_map(|g| g.channel(channel_id))
            .cloned()
    }

    pub fn channel_by_name(&self, guild_id: Snowflake, name: &str) -> Option<Channel> {
        self.state
            .read()
            .guild(guild_id)
            .and_then(|g| g.channel_by_name(name))
            .cloned()
    }

    /// The guild owning the given channel
    pub fn guild_for_channel(&self, channel_id: Snowflake) -> Option<Guild> {
        self.state
            .read()
            .guilds
            .iter()
            .find(|g| g.channel(channel_id).is_some())
            .cloned()
    }

    pub fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<Member> {
        self.state
            .read()
            .guild(guild_id)
            .and_then(|g| g.member(user_id))
            .cloned()
    }

    pub fn member_by_name(&self, guild_id: Snowflake, username: &str) -> Option<Member> {
        self.state
            .read()
            .guild(guild_id)
            .and_then(|g| g.member_by_name(username))
            .cloned()
    }

    pub fn presence(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<Presence> {
        self.state
            .read()
            .guild(guild_id)
            .and_then(|g| g.presence(user_id))
            .cloned()
    }

    /// Find a user anywhere in the mirror
    ///
    /// Checks the authenticated user, then guild members, then private
    /// channel recipients.
    pub fn user(&self, user_id: Snowflake) -> Option<User> {
        let state = self.state.read();

        if let Some(me) = state.current_user.as_ref().filter(|u| u.id == user_id) {
            return Some(me.clone());
        }

        state
            .guilds
            .iter()
            .find_map(|g| g.member(user_id).map(|m| &m.user))
            .or_else(|| {
                state
                    .private_channels
                    .iter()
                    .find(|pc| pc.is_with(user_id))
                    .map(|pc| &pc.recipient)
            })
            .cloned()
    }

    pub fn private_channel(&self, channel_id: Snowflake) -> Option<PrivateChannel> {
        self.state
            .read()
            .private_channels
            .iter()
            .find(|pc| pc.id == channel_id)
            .cloned()
    }

    /// The private channel whose recipient is the given user
    pub fn private_channel_for(&self, user_id: Snowflake) -> Option<PrivateChannel> {
        self.state
            .read()
            .private_channels
            .iter()
            .find(|pc| pc.is_with(user_id))
            .cloned()
    }

    pub fn private_channels(&self) -> Vec<PrivateChannel> {
        self.state.read().private_channels.clone()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Replace the whole mirror with a fresh snapshot
    ///
    /// Guilds are normalized (channel back-references filled in, duplicates
    /// collapsed) and duplicate guild or private channel ids keep the last
    /// occurrence.
    pub fn replace_all(
        &self,
        current_user: User,
        guilds: Vec<Guild>,
        private_channels: Vec<PrivateChannel>,
    ) {
        let mut seeded: Vec<Guild> = Vec::with_capacity(guilds.len());
        for mut guild in guilds {
            guild.normalize();
            match seeded.iter_mut().find(|g| g.id == guild.id) {
                Some(slot) => *slot = guild,
                None => seeded.push(guild),
            }
        }

        let mut dms: Vec<PrivateChannel> = Vec::with_capacity(private_channels.len());
        for pc in private_channels {
            match dms.iter_mut().find(|existing| existing.id == pc.id) {
                Some(slot) => *slot = pc,
                None => dms.push(pc),
            }
        }

        tracing::debug!(
            user_id = %current_user.id,
            guilds = seeded.len(),
            private_channels = dms.len(),
            "State cache seeded"
        );

        let mut state = self.state.write();
        state.current_user = Some(current_user);
        state.guilds = seeded;
        state.private_channels = dms;
    }

    /// Drop everything, including the authenticated user
    pub fn clear(&self) {
        let mut state = self.state.write();
        *state = CacheState::default();
        tracing::debug!("State cache cleared");
    }

    /// Insert a guild or replace the cached guild with the same id
    ///
    /// Returns `true` if the guild was not cached before.
    pub fn insert_guild(&self, mut guild: Guild) -> bool {
        guild.normalize();
        let mut state = self.state.write();
        match state.guilds.iter_mut().find(|g| g.id == guild.id) {
            Some(existing) => {
                *existing = guild;
                false
            }
            None => {
                state.guilds.push(guild);
                true
            }
        }
    }

    pub fn remove_guild(&self, guild_id: Snowflake) -> Option<Guild> {
        let mut state = self.state.write();
        let index = state.guilds.iter().position(|g| g.id == guild_id)?;
        Some(state.guilds.remove(index))
    }

    /// Insert a guild channel or replace the one with the same id in place
    ///
    /// The owning guild must already be cached. Returns `true` if the channel
    /// was not present before.
    pub fn upsert_channel(&self, channel: Channel) -> CacheResult<bool> {
        let guild_id = channel
            .guild_id
            .ok_or(CacheError::MissingGuildId(channel.id))?;
        let mut state = self.state.write();
        Ok(state.guild_mut(guild_id)?.upsert_channel(channel))
    }

    /// Remove a guild channel by id from whichever guild holds it
    pub fn remove_channel(&self, channel_id: Snowflake) -> Option<Channel> {
        let mut state = self.state.write();
        state
            .guilds
            .iter_mut()
            .find_map(|g| g.remove_channel(channel_id))
    }

    /// Insert a private channel or replace the one with the same id
    pub fn insert_private_channel(&self, channel: PrivateChannel) -> bool {
        let mut state = self.state.write();
        match state
            .private_channels
            .iter_mut()
            .find(|pc| pc.id == channel.id)
        {
            Some(existing) => {
                *existing = channel;
                false
            }
            None => {
                state.private_channels.push(channel);
                true
            }
        }
    }

    pub fn remove_private_channel(&self, channel_id: Snowflake) -> Option<PrivateChannel> {
        let mut state = self.state.write();
        let index = state
            .private_channels
            .iter()
            .position(|pc| pc.id == channel_id)?;
        Some(state.private_channels.remove(index))
    }

    /// Add a member to a cached guild, replacing any entry for the same user
    pub fn upsert_member(&self, guild_id: Snowflake, member: Member) -> CacheResult<bool> {
        let mut state = self.state.write();
        Ok(state.guild_mut(guild_id)?.upsert_member(member))
    }

    pub fn remove_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> CacheResult<Option<Member>> {
        let mut state = self.state.write();
        Ok(state.guild_mut(guild_id)?.remove_member(user_id))
    }

    /// Record a presence in the guild it names
    pub fn upsert_presence(&self, guild_id: Snowflake, presence: Presence) -> CacheResult<bool> {
        let mut state = self.state.write();
        Ok(state.guild_mut(guild_id)?.upsert_presence(presence))
    }

    // ========================================================================
    // Derived
    // ========================================================================

    /// Find the private channel with `user_id`, opening one if none exists
    ///
    /// On a miss exactly one creation request is issued. Concurrent callers
    /// wait on the same lock and re-check the cache once they hold it, so a
    /// burst of calls for the same user still produces a single request.
    pub async fn get_or_create_private_channel(
        &self,
        user_id: Snowflake,
        creator: &dyn PrivateChannelCreator,
    ) -> CacheResult<PrivateChannel> {
        if let Some(existing) = self.private_channel_for(user_id) {
            return Ok(existing);
        }

        let _guard = self.private_channel_lock.lock().await;

        if let Some(existing) = self.private_channel_for(user_id) {
            return Ok(existing);
        }

        let created = creator
            .create_private_channel(user_id)
            .await
            .map_err(CacheError::PrivateChannelCreation)?;

        tracing::debug!(
            user_id = %user_id,
            channel_id = %created.id,
            "Private channel created"
        );

        self.insert_private_channel(created.clone());
        Ok(created)
    }
}
