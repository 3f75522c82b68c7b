//! Client configuration

use std::time::Duration;

use relaycord_common::ReconnectSettings;

use crate::protocol::IdentifyProperties;

/// Default capacity of the outbound frame queue
pub const DEFAULT_EVENT_BUFFER: usize = 100;

/// What to do after a connection is lost
///
/// Disabled by default: the first loss ends [`crate::Client::run`] with an
/// error. When enabled, the client reconnects after `delay` (zero means
/// immediately), giving up once `max_attempts` consecutive sessions failed
/// without reaching Ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    pub delay: Duration,
    pub max_attempts: Option<u32>,
}

impl ReconnectPolicy {
    /// Reconnect immediately, forever
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Check if reconnect attempt number `attempt` (1-based) is allowed
    #[must_use]
    pub fn allows(&self, attempt: u32) -> bool {
        self.enabled && self.max_attempts.is_none_or(|max| attempt <= max)
    }
}

impl From<&ReconnectSettings> for ReconnectPolicy {
    fn from(settings: &ReconnectSettings) -> Self {
        Self {
            enabled: settings.enabled,
            delay: settings.delay(),
            max_attempts: settings.max_attempts,
        }
    }
}

/// Everything a session needs to connect and identify
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Fixed gateway URL; discovered over REST when `None`
    pub url: Option<String>,
    pub token: String,
    pub properties: IdentifyProperties,
    pub event_buffer: usize,
    pub reconnect: ReconnectPolicy,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            url: None,
            token: token.into(),
            properties: IdentifyProperties::default(),
            event_buffer: DEFAULT_EVENT_BUFFER,
            reconnect: ReconnectPolicy::default(),
        }
    }
}
