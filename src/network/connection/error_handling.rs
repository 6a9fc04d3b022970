//! Classification of client read errors.

use slirc_wire::{Command, Message, ProtocolError};

/// What to do after the client stream yields an error.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum ReadErrorAction {
    /// The client sent something unusable: say why, then disconnect.
    FatalProtocolError { error_msg: String },
    /// The socket itself broke; nothing can be written back.
    IoError,
}

/// Classify an IRC decode error.
///
/// Every decode failure ends the session. Only the reply differs.
pub(super) fn classify_read_error(e: &ProtocolError) -> ReadErrorAction {
    match e {
        ProtocolError::Io(_) => ReadErrorAction::IoError,
        ProtocolError::MessageTooLong { actual, limit } => ReadErrorAction::FatalProtocolError {
            error_msg: format!("Line too long ({actual} > {limit} bytes)"),
        },
        ProtocolError::IllegalControlChar(ch) => ReadErrorAction::FatalProtocolError {
            error_msg: format!("Illegal control character: {ch:?}"),
        },
        ProtocolError::InvalidMessage { cause, .. } => ReadErrorAction::FatalProtocolError {
            error_msg: format!("Malformed message: {cause}"),
        },
        ProtocolError::InvalidUtf8 { .. } => ReadErrorAction::FatalProtocolError {
            error_msg: "Invalid UTF-8 in message".to_string(),
        },
        _ => ReadErrorAction::FatalProtocolError {
            error_msg: format!("Protocol error: {e}"),
        },
    }
}

/// `ERROR :Closing link: <reason>`
pub(super) fn closing_link(reason: &str) -> Message {
    Message::from(Command::Raw(
        "ERROR".to_string(),
        vec![format!("Closing link: {reason}")],
    ))
}
