//! Per-connection session state.
//!
//! ```text
//! Connecting ──NICK/PASS──▶ Authenticating ──both set──▶ Active ──EOF/QUIT──▶ Closed
//! ```
//!
//! The welcome burst is sent exactly once, on the transition into `Active`.

use std::collections::HashMap;

use super::directory::ChatDirectory;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Socket accepted, nothing received yet.
    Connecting,
    /// One of NICK/PASS received.
    Authenticating,
    /// Welcomed; normal command handling.
    Active,
    /// Either side ended; no further output.
    Closed,
}

/// Mutable state owned by the session task.
#[derive(Debug)]
pub struct SessionState {
    pub nickname: Option<String>,
    /// Phone number bound through PASS, used to recognize own messages.
    pub identity: Option<String>,
    welcomed: bool,
    phase: SessionPhase,
    pub chats: ChatDirectory,
    /// Commands dispatched on this connection.
    commands: HashMap<&'static str, u64>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            nickname: None,
            identity: None,
            welcomed: false,
            phase: SessionPhase::Connecting,
            chats: ChatDirectory::new(),
            commands: HashMap::new(),
        }
    }

    /// The nick, or `*` before NICK has been seen.
    pub fn nick_or_star(&self) -> &str {
        self.nickname.as_deref().unwrap_or("*")
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn set_nick(&mut self, nick: String) {
        self.nickname = Some(nick);
        self.touch();
    }

    pub fn set_identity(&mut self, number: String) {
        self.identity = Some(number);
        self.touch();
    }

    fn touch(&mut self) {
        if self.phase == SessionPhase::Connecting {
            self.phase = SessionPhase::Authenticating;
        }
    }

    /// Mark the session welcomed if NICK and PASS are both known.
    ///
    /// Returns the nick exactly once, on the call that flips the flag.
    pub fn try_welcome(&mut self) -> Option<&str> {
        if self.welcomed || self.phase == SessionPhase::Closed {
            return None;
        }
        let ready = self.nickname.as_deref().is_some_and(|n| !n.is_empty())
            && self.identity.as_deref().is_some_and(|n| !n.is_empty());
        if !ready {
            return None;
        }
        self.welcomed = true;
        self.phase = SessionPhase::Active;
        self.nickname.as_deref()
    }

    pub fn is_welcomed(&self) -> bool {
        self.welcomed
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn close(&mut self) {
        self.phase = SessionPhase::Closed;
    }

    pub fn record_command(&mut self, command: &'static str) {
        *self.commands.entry(command).or_default() += 1;
    }

    /// Command counts for this session, most used first.
    pub fn command_stats(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self.commands.iter().map(|(cmd, n)| (*cmd, *n)).collect();
        stats.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        stats
    }
}
