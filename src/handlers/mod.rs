//! IRC command handlers and bridge event handling.
//!
//! Commands go through the [`Registry`]; bridge events through
//! [`handle_event`]. Both run on the session task with a [`Context`] that
//! borrows the session's state, so neither path needs locking.

mod channel;
mod connection;
pub mod core;
mod events;
pub mod helpers;
mod join;
mod messaging;
mod relay;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::core::{Context, Handler, HandlerError, HandlerResult, Registry};
pub use events::handle_event;
pub use join::join_chat;
pub use relay::relay_group;
