//! IRC commands understood or emitted by the bridge.
//!
//! Commands outside this subset (or recognized commands with too few
//! parameters) are kept verbatim in [`Command::Raw`] so callers can still
//! dispatch on the name and report missing parameters.

use std::fmt::{self, Write};

use crate::error::MessageParseError;
use crate::response::Response;

/// IRC command with its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    /// `PASS password`
    PASS(String),
    /// `NICK nickname`
    NICK(String),
    /// `USER username mode realname`
    USER(String, String, String),
    /// `CAP params...`
    CAP(Vec<String>),
    /// `PING server [target]`
    PING(String, Option<String>),
    /// `PONG server [token]`
    PONG(String, Option<String>),
    /// `PRIVMSG target text`
    PRIVMSG(String, String),
    /// `JOIN channels [keys]`
    JOIN(String, Option<String>),
    /// `PART channels [message]`
    PART(String, Option<String>),
    /// `QUIT [message]`
    QUIT(Option<String>),
    /// `MODE target [modes and arguments]`
    MODE(String, Vec<String>),
    /// Numeric reply.
    Response(Response, Vec<String>),
    /// Anything else, name uppercased.
    Raw(String, Vec<String>),
}

impl Command {
    /// Build a command from its name and raw parameters.
    pub fn new(cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
        let name = cmd.to_ascii_uppercase();

        if name.len() == 3 && name.bytes().all(|b| b.is_ascii_digit()) {
            let code: u16 = name
                .parse()
                .map_err(|_| MessageParseError::InvalidNumeric(name.clone()))?;
            if code == 0 {
                return Err(MessageParseError::InvalidNumeric(name));
            }
            let params = owned(&args);
            return Ok(match Response::from_u16(code) {
                Some(response) => Command::Response(response, params),
                None => Command::Raw(name, params),
            });
        }

        let arg = |i: usize| args.get(i).map(|s| s.to_string());

        let command = match (name.as_str(), args.len()) {
            ("PASS", n) if n >= 1 => Command::PASS(args[0].to_string()),
            ("NICK", n) if n >= 1 => Command::NICK(args[0].to_string()),
            ("USER", n) if n >= 4 => {
                Command::USER(args[0].to_string(), args[1].to_string(), args[3].to_string())
            }
            ("CAP", n) if n >= 1 => Command::CAP(owned(&args)),
            ("PING", n) if n >= 1 => Command::PING(args[0].to_string(), arg(1)),
            ("PONG", n) if n >= 1 => Command::PONG(args[0].to_string(), arg(1)),
            ("PRIVMSG", n) if n >= 2 => {
                Command::PRIVMSG(args[0].to_string(), args[1].to_string())
            }
            ("JOIN", n) if n >= 1 => Command::JOIN(args[0].to_string(), arg(1)),
            ("PART", n) if n >= 1 => Command::PART(args[0].to_string(), arg(1)),
            ("QUIT", _) => Command::QUIT(arg(0)),
            ("MODE", n) if n >= 1 => Command::MODE(args[0].to_string(), owned(&args[1..])),
            _ => Command::Raw(name, owned(&args)),
        };
        Ok(command)
    }

    /// Uppercase command name (numerics as three digits).
    pub fn name(&self) -> String {
        match self {
            Command::PASS(_) => "PASS".into(),
            Command::NICK(_) => "NICK".into(),
            Command::USER(..) => "USER".into(),
            Command::CAP(_) => "CAP".into(),
            Command::PING(..) => "PING".into(),
            Command::PONG(..) => "PONG".into(),
            Command::PRIVMSG(..) => "PRIVMSG".into(),
            Command::JOIN(..) => "JOIN".into(),
            Command::PART(..) => "PART".into(),
            Command::QUIT(_) => "QUIT".into(),
            Command::MODE(..) => "MODE".into(),
            Command::Response(r, _) => r.to_string(),
            Command::Raw(name, _) => name.clone(),
        }
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Whether the last parameter must be sent in trailing (`:`) form.
pub fn needs_colon_prefix(s: &str) -> bool {
    s.is_empty() || s.contains(' ') || s.starts_with(':')
}

/// Write a command, adding the trailing colon only where required.
fn write_cmd(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    f.write_str(cmd)?;
    let len = args.len();
    for (i, arg) in args.iter().enumerate() {
        f.write_char(' ')?;
        if i == len - 1 && needs_colon_prefix(arg) {
            f.write_char(':')?;
        }
        f.write_str(arg)?;
    }
    Ok(())
}

/// Write a command whose last parameter is always free-form text.
fn write_cmd_freeform(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    match args.split_last() {
        Some((suffix, middle)) => {
            f.write_str(cmd)?;
            for arg in middle {
                f.write_char(' ')?;
                f.write_str(arg)?;
            }
            f.write_str(" :")?;
            f.write_str(suffix)
        }
        None => f.write_str(cmd),
    }
}

fn refs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PASS(p) => write_cmd(f, "PASS", &[p]),
            Command::NICK(n) => write_cmd(f, "NICK", &[n]),
            Command::USER(u, m, r) => write_cmd_freeform(f, "USER", &[u, m, "*", r]),
            Command::CAP(args) => write_cmd(f, "CAP", &refs(args)),
            Command::PING(s, Some(t)) => write_cmd_freeform(f, "PING", &[s, t]),
            Command::PING(s, None) => write_cmd(f, "PING", &[s]),
            Command::PONG(s, Some(t)) => write_cmd_freeform(f, "PONG", &[s, t]),
            Command::PONG(s, None) => write_cmd(f, "PONG", &[s]),
            Command::PRIVMSG(t, m) => write_cmd_freeform(f, "PRIVMSG", &[t, m]),
            Command::JOIN(c, Some(k)) => write_cmd(f, "JOIN", &[c, k]),
            Command::JOIN(c, None) => write_cmd(f, "JOIN", &[c]),
            Command::PART(c, Some(m)) => write_cmd_freeform(f, "PART", &[c, m]),
            Command::PART(c, None) => write_cmd(f, "PART", &[c]),
            Command::QUIT(Some(m)) => write_cmd_freeform(f, "QUIT", &[m]),
            Command::QUIT(None) => f.write_str("QUIT"),
            Command::MODE(target, args) => {
                let mut all = vec![target.as_str()];
                all.extend(args.iter().map(String::as_str));
                write_cmd(f, "MODE", &all)
            }
            Command::Response(resp, args) => {
                write_cmd_freeform(f, &resp.to_string(), &refs(args))
            }
            Command::Raw(name, args) => write_cmd(f, name, &refs(args)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_commands_fall_back_to_raw() {
        let cmd = Command::new("privmsg", vec!["#chan"]).unwrap();
        assert_eq!(cmd, Command::Raw("PRIVMSG".into(), vec!["#chan".into()]));
        assert_eq!(cmd.name(), "PRIVMSG");
    }

    #[test]
    fn numerics_resolve_to_responses() {
        let cmd = Command::new("353", vec!["me", "@", "#c", "a b"]).unwrap();
        assert!(matches!(cmd, Command::Response(Response::RPL_NAMREPLY, _)));

        let unknown = Command::new("999", vec![]).unwrap();
        assert_eq!(unknown, Command::Raw("999".into(), vec![]));

        assert!(Command::new("000", vec![]).is_err());
    }

    #[test]
    fn freeform_commands_always_use_trailing() {
        let pong = Command::PONG("whapp-irc".into(), Some("token".into()));
        assert_eq!(pong.to_string(), "PONG whapp-irc :token");

        let names = Command::Response(
            Response::RPL_NAMREPLY,
            vec!["me".into(), "@".into(), "#c".into(), "@alice".into()],
        );
        assert_eq!(names.to_string(), "353 me @ #c :@alice");
    }

    #[test]
    fn plain_commands_add_colon_only_when_needed() {
        let mode = Command::MODE("#c".into(), vec!["+o".into(), "me".into()]);
        assert_eq!(mode.to_string(), "MODE #c +o me");

        let cap = Command::CAP(vec!["*".into(), "LS".into()]);
        assert_eq!(cap.to_string(), "CAP * LS");

        let raw = Command::Raw("CAP".into(), vec!["*".into(), "ACK".into(), "a b".into()]);
        assert_eq!(raw.to_string(), "CAP * ACK :a b");
    }
}
