//! Session state: the chat directory and the data model it holds.

mod directory;
pub mod model;
mod session;

pub use directory::ChatDirectory;
pub use model::{Chat, ChatMessage, Contact, MessageGroup};
pub use session::{SessionPhase, SessionState};
