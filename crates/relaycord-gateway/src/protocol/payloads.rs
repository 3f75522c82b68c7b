//! Control payload definitions
//!
//! Payloads of the non-dispatch frames: Hello in, Identify and StatusUpdate
//! out.

use relaycord_core::Game;
use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

/// Payload for op 2 (Identify)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyPayload {
    pub token: String,
    pub properties: IdentifyProperties,
    /// Gateway protocol version
    pub v: u8,
}

impl IdentifyPayload {
    /// Protocol version sent in every Identify
    pub const VERSION: u8 = 3;

    #[must_use]
    pub fn new(token: impl Into<String>, properties: IdentifyProperties) -> Self {
        Self {
            token: token.into(),
            properties,
            v: Self::VERSION,
        }
    }
}

/// Client metadata reported in Identify
///
/// The gateway expects the legacy `$`-prefixed keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    #[serde(rename = "$os")]
    pub os: String,
    #[serde(rename = "$browser")]
    pub browser: String,
    #[serde(rename = "$device")]
    pub device: String,
    #[serde(rename = "$referer")]
    pub referer: String,
    #[serde(rename = "$referring_domain")]
    pub referring_domain: String,
}

impl IdentifyProperties {
    /// Set browser and device name
    #[must_use]
    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.browser.clone_from(&name);
        self.device = name;
        self
    }
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: "relaycord".to_string(),
            device: "relaycord".to_string(),
            referer: String::new(),
            referring_domain: String::new(),
        }
    }
}

/// Payload for op 3 (StatusUpdate)
///
/// Both fields are always present on the wire; `null` clears them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdatePayload {
    pub game: Option<Game>,
    pub idle_since: Option<u64>,
}

impl StatusUpdatePayload {
    /// Show "playing `name`", or clear the game with `None`
    #[must_use]
    pub fn playing(name: Option<&str>) -> Self {
        Self {
            game: name.map(Game::named),
            idle_since: None,
        }
    }
}
