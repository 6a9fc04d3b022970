//! Error types for command handling, joining and relaying.
//!
//! Collaborator errors (bridge, blob store, QR rendering, config) live beside
//! their modules.

use slirc_wire::Message;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::handlers::helpers::err_needmoreparams;

/// Errors that can occur while handling an IRC command.
#[derive(Debug, Error)]
#[allow(clippy::large_enum_variant)] // Send variant is large but rarely constructed
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Message>),

    #[error("client quit: {0:?}")]
    Quit(Option<String>),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Static error code for log fields.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams => "need_more_params",
            Self::Send(_) => "send_error",
            Self::Quit(_) => "quit",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Convert to an IRC error reply.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply.
    pub fn to_irc_reply(&self, server_name: &str, nick: &str, cmd_name: &str) -> Option<Message> {
        match self {
            Self::NeedMoreParams => Some(err_needmoreparams(server_name, nick, cmd_name)),
            Self::Send(_) | Self::Quit(_) | Self::Internal(_) => None,
        }
    }

    /// Whether the session must end after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Send(_) | Self::Quit(_))
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// Precondition failures when presenting a chat as a channel.
#[derive(Debug, Error)]
#[allow(clippy::large_enum_variant)]
pub enum JoinError {
    #[error("chat is nil")]
    NoChat,

    #[error("not a group chat")]
    NotGroupChat(String),

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Message>),
}

impl From<JoinError> for HandlerError {
    fn from(err: JoinError) -> Self {
        match err {
            JoinError::Send(e) => HandlerError::Send(e),
            other => HandlerError::Internal(other.to_string()),
        }
    }
}

/// Failures while translating bridge messages to IRC.
#[derive(Debug, Error)]
#[allow(clippy::large_enum_variant)]
pub enum RelayError {
    /// Messages referenced a chat that was never announced.
    #[error("unknown chat: {0}")]
    UnknownChat(String),

    #[error("auto-join failed: {0}")]
    Join(JoinError),

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Message>),
}

impl From<JoinError> for RelayError {
    fn from(err: JoinError) -> Self {
        match err {
            JoinError::Send(e) => RelayError::Send(e),
            other => RelayError::Join(other),
        }
    }
}

impl RelayError {
    /// True when the IRC writer is gone and the session is ending.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Send(_))
    }
}
