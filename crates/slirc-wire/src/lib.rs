//! # slirc-wire
//!
//! The slice of the IRC protocol that slirc-bridge speaks to its clients:
//! message parsing and serialization, the numerics the bridge emits, and a
//! tokio codec for line-framed sockets.
//!
//! ```rust
//! use slirc_wire::{Command, Message, Prefix};
//!
//! let msg: Message = ":nick PRIVMSG #general :hello there".parse().unwrap();
//! assert!(matches!(msg.command, Command::PRIVMSG(_, _)));
//!
//! let reply = Message::privmsg("#general", "hi").with_prefix(Prefix::nick("bot"));
//! assert_eq!(reply.to_string(), ":bot PRIVMSG #general :hi\r\n");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod codec;
pub mod command;
pub mod error;
pub mod line;
pub mod message;
pub mod prefix;
pub mod response;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};
pub use self::codec::IrcCodec;
pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
pub use self::line::LineCodec;
pub use self::message::{Message, Tag};
pub use self::prefix::Prefix;
pub use self::response::Response;
