//! Error types for the wire codec.

use thiserror::Error;

/// Convenience alias for results carrying a [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors produced while framing or decoding IRC lines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error on the underlying transport.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The line is not valid UTF-8.
    #[error("invalid UTF-8 in message at byte {byte_pos}: {details}")]
    InvalidUtf8 {
        /// Byte position where validation failed.
        byte_pos: usize,
        /// Decoder detail.
        details: String,
    },

    /// A line exceeded the configured maximum length.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Observed length.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },

    /// A control character that may not appear on the wire.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// The line could not be parsed as an IRC message.
    #[error("invalid message: {string:?}: {cause}")]
    InvalidMessage {
        /// The offending line.
        string: String,
        /// Why parsing failed.
        #[source]
        cause: MessageParseError,
    },
}

/// Reasons a single line fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageParseError {
    /// Nothing but whitespace.
    #[error("empty message")]
    EmptyMessage,

    /// The command token is missing or malformed.
    #[error("invalid command at position {position}")]
    InvalidCommand {
        /// Character offset where the command was expected.
        position: usize,
    },

    /// A numeric command outside the 001-999 range.
    #[error("invalid numeric: {0}")]
    InvalidNumeric(String),
}

/// Returns true for control characters that are never valid inside a line.
///
/// CR and LF terminate lines and are handled by framing; formatting codes
/// (bold, colour, etc.) are legitimate message content.
pub(crate) fn is_illegal_control_char(ch: char) -> bool {
    ch == '\0'
}
