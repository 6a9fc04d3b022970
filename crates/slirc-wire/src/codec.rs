//! IRC message codec for tokio.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, is_illegal_control_char, ProtocolError};
use crate::line::LineCodec;
use crate::message::Message;

/// Frames a byte stream into [`Message`]s and back.
///
/// Blank lines are skipped, as RFC 1459 asks servers to ignore them.
#[derive(Default)]
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    /// Codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            inner: LineCodec::with_max_len(max_len),
        }
    }

    /// Sanitize an outgoing line: cut at the first line ending, reject NUL.
    pub fn sanitize(mut data: String) -> error::Result<String> {
        if let Some(pos) = data.find(['\r', '\n']) {
            data.truncate(pos);
        }
        if let Some(ch) = data.chars().find(|c| is_illegal_control_char(*c)) {
            return Err(ProtocolError::IllegalControlChar(ch));
        }
        data.push_str("\r\n");
        Ok(data)
    }
}

impl Decoder for IrcCodec {
    type Item = Message;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Message>> {
        loop {
            match self.inner.decode(src)? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return line.parse::<Message>().map(Some),
                None => return Ok(None),
            }
        }
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> error::Result<()> {
        let sanitized = Self::sanitize(msg.to_string())?;
        self.inner.encode(sanitized, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::prefix::Prefix;

    #[test]
    fn skips_blank_lines() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::from("\r\n\r\nNICK bob\r\n");
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.command, Command::NICK("bob".into()));
    }

    #[test]
    fn garbage_is_an_error() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::from(":prefix-only\r\n");
        assert!(codec.decode(&mut buf).is_err());
    }

    #[test]
    fn encode_truncates_embedded_newlines() {
        let mut codec = IrcCodec::default();
        let mut buf = BytesMut::new();
        let msg = Message::privmsg("#c", "one\r\ntwo").with_prefix(Prefix::nick("a"));
        codec.encode(msg, &mut buf).unwrap();
        assert_eq!(&buf[..], b":a PRIVMSG #c :one\r\n");
    }
}
