//! User entity - a platform account as seen by the gateway

use serde::{Deserialize, Deserializer, Serialize};

use crate::value_objects::Snowflake;

/// User identity
///
/// Payloads that only carry a partial user (presence updates, member removals)
/// still decode: everything except `id` is optional or defaulted. The cache
/// replaces users wholesale and never merges fields from partial payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    #[serde(default)]
    pub username: String,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub discriminator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Create a user with only the required fields
    pub fn new(id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            discriminator: None,
            avatar: None,
            email: None,
            verified: false,
            bot: false,
        }
    }

    /// Get the full tag: username#discriminator (or just the username)
    pub fn tag(&self) -> String {
        match &self.discriminator {
            Some(d) => format!("{}#{}", self.username, d),
            None => self.username.clone(),
        }
    }

    /// Get the avatar URL relative to the given API base, if the user has one
    pub fn avatar_url(&self, api_base: &str) -> Option<String> {
        self.avatar.as_ref().map(|hash| {
            format!(
                "{}/users/{}/avatars/{}.jpg",
                api_base.trim_end_matches('/'),
                self.id,
                hash
            )
        })
    }
}

/// Accept a discriminator sent either as a JSON string or a number
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number discriminator, got {other}"
        ))),
    }
}
