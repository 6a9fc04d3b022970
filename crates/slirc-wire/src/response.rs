//! IRC numeric replies emitted by the bridge.
//!
//! Only the numerics slirc-bridge actually sends or may receive are listed;
//! anything else parses into [`Command::Raw`](crate::Command::Raw).

#![allow(non_camel_case_types)]

use std::fmt;

/// IRC server numeric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Welcome to the network
    RPL_WELCOME = 1,
    /// 002 - Your host is ...
    RPL_YOURHOST = 2,
    /// 332 - Channel topic
    RPL_TOPIC = 332,
    /// 353 - Names list
    RPL_NAMREPLY = 353,
    /// 366 - End of names list
    RPL_ENDOFNAMES = 366,
    /// 401 - No such nick/channel
    ERR_NOSUCHNICK = 401,
    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 421 - Unknown command
    ERR_UNKNOWNCOMMAND = 421,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
}

impl Response {
    /// Numeric value.
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up a known numeric.
    pub fn from_u16(code: u16) -> Option<Response> {
        Some(match code {
            1 => Response::RPL_WELCOME,
            2 => Response::RPL_YOURHOST,
            332 => Response::RPL_TOPIC,
            353 => Response::RPL_NAMREPLY,
            366 => Response::RPL_ENDOFNAMES,
            401 => Response::ERR_NOSUCHNICK,
            403 => Response::ERR_NOSUCHCHANNEL,
            421 => Response::ERR_UNKNOWNCOMMAND,
            461 => Response::ERR_NEEDMOREPARAMS,
            _ => return None,
        })
    }

    /// True for 400-599 error numerics.
    pub fn is_error(self) -> bool {
        (400..600).contains(&self.code())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_zero_padded() {
        assert_eq!(Response::RPL_WELCOME.to_string(), "001");
        assert_eq!(Response::RPL_NAMREPLY.to_string(), "353");
    }

    #[test]
    fn from_u16_matches_code() {
        for r in [
            Response::RPL_WELCOME,
            Response::RPL_TOPIC,
            Response::RPL_ENDOFNAMES,
            Response::ERR_NEEDMOREPARAMS,
        ] {
            assert_eq!(Response::from_u16(r.code()), Some(r));
        }
        assert_eq!(Response::from_u16(999), None);
        assert!(Response::ERR_NEEDMOREPARAMS.is_error());
        assert!(!Response::RPL_TOPIC.is_error());
    }
}
