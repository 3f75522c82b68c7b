//! Gateway close codes
//!
//! Only the codes that change what the client does next are named here.
//! Every other code, including the plain WebSocket ones (1000, 1006, ...),
//! is a dropped link and goes through the reconnect policy.

/// What the run loop does once the gateway closes the socket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Connect again under the reconnect policy
    Reconnect,
    /// The token was refused; connecting again needs a new one
    Reauthenticate,
    /// The client is misconfigured for this gateway
    GiveUp,
}

impl CloseAction {
    /// Action for a raw close code
    #[must_use]
    pub fn for_code(code: u16) -> Self {
        CloseCode::try_from(code).map_or(Self::Reconnect, CloseCode::action)
    }
}

/// Close codes the client refuses to reconnect after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CloseCode {
    /// A frame arrived before Identify; this client always identifies first
    NotAuthenticated = 4003,
    AuthenticationFailed = 4004,
    InvalidShard = 4010,
    ShardingRequired = 4011,
    /// The gateway does not speak protocol version 3
    InvalidApiVersion = 4012,
}

impl CloseCode {
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    #[must_use]
    pub const fn action(self) -> CloseAction {
        match self {
            Self::AuthenticationFailed => CloseAction::Reauthenticate,
            Self::NotAuthenticated
            | Self::InvalidShard
            | Self::ShardingRequired
            | Self::InvalidApiVersion => CloseAction::GiveUp,
        }
    }
}

impl TryFrom<u16> for CloseCode {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Ok(match value {
            4003 => Self::NotAuthenticated,
            4004 => Self::AuthenticationFailed,
            4010 => Self::InvalidShard,
            4011 => Self::ShardingRequired,
            4012 => Self::InvalidApiVersion,
            other => return Err(other),
        })
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self, self.as_u16())
    }
}
