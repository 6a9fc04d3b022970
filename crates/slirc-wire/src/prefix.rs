//! IRC message prefix (message source).

use std::fmt;

/// Origin of a message: a server name or a `nick!user@host` mask.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name.
    ServerName(String),
    /// User mask as (nickname, username, hostname). User and host may be empty.
    Nickname(String, String, String),
}

impl Prefix {
    /// Lenient parse of a raw prefix string.
    ///
    /// A dot before any `!`/`@` marks a server name.
    pub fn new_from_str(s: &str) -> Self {
        let (name_user, host) = match s.split_once('@') {
            Some((left, host)) => (left, host),
            None => (s, ""),
        };
        let (name, user) = match name_user.split_once('!') {
            Some((name, user)) => (name, user),
            None => (name_user, ""),
        };

        if user.is_empty() && host.is_empty() && name.contains('.') {
            Prefix::ServerName(name.to_string())
        } else {
            Prefix::Nickname(name.to_string(), user.to_string(), host.to_string())
        }
    }

    /// Bare-nickname prefix (`:nick`).
    pub fn nick(nick: impl Into<String>) -> Self {
        Prefix::Nickname(nick.into(), String::new(), String::new())
    }

    /// The nickname or server name part.
    pub fn name(&self) -> &str {
        match self {
            Prefix::ServerName(name) | Prefix::Nickname(name, _, _) => name,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => f.write_str(name),
            Prefix::Nickname(name, user, host) => {
                f.write_str(name)?;
                if !user.is_empty() {
                    write!(f, "!{user}")?;
                }
                if !host.is_empty() {
                    write!(f, "@{host}")?;
                }
                Ok(())
            }
        }
    }
}
