//! Domain entities - everything the gateway can describe

mod channel;
mod guild;
mod member;
mod message;
mod presence;
mod role;
mod user;

pub use channel::{Channel, ChannelKind, PrivateChannel};
pub use guild::{Guild, GuildDelete};
pub use member::Member;
pub use message::{Message, MessageReference, PartialMessage, Typing};
pub use presence::{Game, Presence, PresenceStatus};
pub use role::Role;
pub use user::User;
