//! Member entity - a user's membership in one guild

use serde::{Deserialize, Serialize};

use crate::entities::User;
use crate::value_objects::Snowflake;

/// Guild member
///
/// Membership is guild-scoped: the same user appears once per guild they
/// belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    #[serde(rename = "mute", default)]
    pub muted: bool,
    #[serde(rename = "deaf", default)]
    pub deafened: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
    /// Present on member events, absent inside guild payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}

impl Member {
    /// Create a member with no roles
    pub fn new(user: User) -> Self {
        Self {
            user,
            roles: Vec::new(),
            muted: false,
            deafened: false,
            joined_at: None,
            guild_id: None,
        }
    }

    /// Get the user id of this member
    #[inline]
    pub fn user_id(&self) -> Snowflake {
        self.user.id
    }

    /// Check if member has a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.roles.contains(&role_id)
    }
}
