//! Network layer: the IRC listener and per-connection sessions.

mod connection;
mod gateway;

pub use connection::{Connection, ExitReason, SessionSettings, Shared};
pub use gateway::Gateway;
