//! Chat, contact and message types as announced by the bridge.
//!
//! These deserialize straight from bridge event payloads. Fields the gateway
//! derives itself (identifier, admin flags, join state) are skipped by serde
//! and filled in by the [`ChatDirectory`](super::ChatDirectory).

use serde::Deserialize;
use std::collections::HashSet;

/// Characters allowed in IRC nicks besides ASCII alphanumerics.
const NICK_SPECIALS: &[char] = &['-', '_', '[', ']', '\\', '`', '^', '{', '}', '|'];

/// Turn free text into something usable as an IRC nick or channel name.
///
/// Whitespace becomes `_`, anything outside the nick alphabet is dropped.
pub fn safe_name(text: &str) -> String {
    text.trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || NICK_SPECIALS.contains(&c) {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// The phone-number part of a remote ID (`31612345678@c.us` -> `31612345678`).
pub fn id_number(id: &str) -> &str {
    let user = id.split_once('@').map_or(id, |(user, _)| user);
    user.trim_start_matches('+')
}

/// A participant of a chat, or the sender of a message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    #[serde(default, alias = "fullName")]
    pub name: Option<String>,
    #[serde(default)]
    pub push_name: Option<String>,
    #[serde(skip)]
    pub is_admin: bool,
}

impl Contact {
    /// Display name: saved name, then self-chosen push name, then number.
    pub fn full_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.push_name.as_deref().filter(|n| !n.trim().is_empty()))
            .unwrap_or_else(|| id_number(&self.id))
    }

    /// IRC-safe form of [`full_name`](Self::full_name).
    pub fn safe_name(&self) -> String {
        let name = safe_name(self.full_name());
        if name.is_empty() {
            safe_name(id_number(&self.id))
        } else {
            name
        }
    }

    /// True when this contact is the account bound to the session.
    pub fn is_self(&self, identity: Option<&str>) -> bool {
        identity.is_some_and(|number| {
            let number = number.trim_start_matches('+');
            !number.is_empty() && id_number(&self.id) == number
        })
    }
}

/// Admin entries arrive either as bare IDs or as contact objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdminRef {
    Id(String),
    Contact { id: String },
}

impl AdminRef {
    pub fn id(&self) -> &str {
        match self {
            AdminRef::Id(id) | AdminRef::Contact { id } => id,
        }
    }
}

/// A conversation on the remote service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "isGroup")]
    pub is_group_chat: bool,
    #[serde(default)]
    pub participants: Vec<Contact>,
    #[serde(default)]
    pub admins: Vec<AdminRef>,

    /// IRC name, assigned by the directory.
    #[serde(skip)]
    pub identifier: String,
    /// Whether the client has been shown this chat as a joined channel.
    #[serde(skip)]
    pub joined: bool,
    /// Group status as computed against the session identity.
    #[serde(skip)]
    pub group: bool,
    /// Set while `group` was computed without a known identity.
    #[serde(skip)]
    pub(crate) provisional: bool,
}

impl Chat {
    /// Set every participant's admin flag from the `admins` list.
    pub fn refresh_admins(&mut self) {
        let admins: HashSet<&str> = self.admins.iter().map(AdminRef::id).collect();
        for contact in &mut self.participants {
            contact.is_admin = admins.contains(contact.id.as_str());
        }
    }

    /// Explicit group flag, or more than one participant besides ourselves.
    pub fn compute_group(&self, identity: Option<&str>) -> bool {
        self.is_group_chat
            || self
                .participants
                .iter()
                .filter(|c| !c.is_self(identity))
                .count()
                > 1
    }

    /// Identifier before collision handling: `#name` for groups, `name` otherwise.
    pub fn base_identifier(&self) -> String {
        let mut name = safe_name(&self.name);
        if name.is_empty() {
            name = safe_name(id_number(&self.id));
        }
        if name.is_empty() {
            name = "chat".to_string();
        }
        if self.group {
            format!("#{name}")
        } else {
            name
        }
    }

    pub fn is_group(&self) -> bool {
        self.group
    }
}

/// Reference to a chat inside a message group.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRef {
    pub id: String,
}

/// One message as delivered by the bridge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender: Contact,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl ChatMessage {
    /// Sent by the session's own account (possibly from another device).
    pub fn is_own(&self, identity: Option<&str>) -> bool {
        self.sender.is_self(identity)
    }

    /// Attachment file name, if this message carries one.
    pub fn attachment(&self) -> Option<&str> {
        self.filename.as_deref().filter(|f| !f.is_empty())
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref().filter(|c| !c.is_empty())
    }
}

/// A batch of unread messages for one chat.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageGroup {
    pub chat: ChatRef,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}
