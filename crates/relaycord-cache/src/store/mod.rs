//! State cache storage module.

mod creator;
mod state_cache;

pub use creator::PrivateChannelCreator;
pub use state_cache::{SharedStateCache, StateCache};
