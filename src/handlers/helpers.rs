//! Reply builders shared across handlers.

use slirc_wire::{Command, Message, Prefix, Response};

/// Nick of the pseudo-user that carries session notices.
pub const STATUS_NICK: &str = "status";

/// Helper to create a server reply message (numeric response).
pub fn server_reply(server_name: &str, response: Response, params: Vec<String>) -> Message {
    Message {
        tags: None,
        prefix: Some(Prefix::ServerName(server_name.to_string())),
        command: Command::Response(response, params),
    }
}

/// `:status PRIVMSG <nick> :<text>`
pub fn status_notice(nick: &str, text: impl Into<String>) -> Message {
    Message::privmsg(nick, text).with_prefix(Prefix::nick(STATUS_NICK))
}

/// Create ERR_NEEDMOREPARAMS reply (461) - not enough parameters.
pub fn err_needmoreparams(server_name: &str, nick: &str, command: &str) -> Message {
    server_reply(
        server_name,
        Response::ERR_NEEDMOREPARAMS,
        vec![
            nick.to_string(),
            command.to_string(),
            "Not enough parameters".to_string(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_notice_format() {
        assert_eq!(
            status_notice("alice", "unknown chat").to_string(),
            ":status PRIVMSG alice :unknown chat\r\n"
        );
    }

    #[test]
    fn server_reply_format() {
        let msg = server_reply(
            "whapp-irc",
            Response::RPL_WELCOME,
            vec!["bob".into(), "Welcome to whapp-irc, bob.".into()],
        );
        assert_eq!(msg.to_string(), ":whapp-irc 001 bob :Welcome to whapp-irc, bob.\r\n");
    }
}
