//! Callback dispatch
//!
//! Application-facing side of the event pipeline: the callback registry and
//! the context each callback receives.

mod callbacks;
mod context;

pub use callbacks::{Callback, EventCallbacks};
pub use context::{Context, ContextError};

pub(crate) use callbacks::invoke;
