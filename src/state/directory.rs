//! In-memory registry of the chats announced by the bridge.

use std::collections::HashMap;

use slirc_wire::irc_to_lower;
use tracing::{debug, info};

use super::model::Chat;

/// Chats indexed by bridge ID and by IRC identifier.
///
/// Identifiers are assigned on first insertion. They only change when a
/// chat first inserted before the session identity was known turns out to
/// have the other group status. Lookups by identifier use RFC 1459 casemapping.
#[derive(Debug, Default)]
pub struct ChatDirectory {
    chats: Vec<Chat>,
    by_id: HashMap<String, usize>,
    by_identifier: HashMap<String, usize>,
}

impl ChatDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a chat and return its identifier.
    ///
    /// Admin flags and group status are recomputed. A chat whose ID is
    /// already known keeps its identifier, group status and join state,
    /// unless its group status was settled without an identity and one is
    /// known now.
    pub fn upsert(&mut self, mut chat: Chat, identity: Option<&str>) -> &Chat {
        chat.refresh_admins();

        if let Some(&idx) = self.by_id.get(&chat.id) {
            let existing = &mut self.chats[idx];
            chat.identifier = std::mem::take(&mut existing.identifier);
            chat.joined = existing.joined;
            chat.group = existing.group;
            chat.provisional = existing.provisional;

            if chat.provisional && identity.is_some() {
                chat.provisional = false;
                let group = chat.compute_group(identity);
                if group != chat.group {
                    self.reclassify(idx, &mut chat, group);
                }
            }

            let existing = &mut self.chats[idx];
            *existing = chat;
            debug!(identifier = %existing.identifier, "chat updated");
            return existing;
        }

        chat.group = chat.compute_group(identity);
        chat.provisional = identity.is_none();
        chat.identifier = self.unique_identifier(&chat.base_identifier());

        let idx = self.chats.len();
        self.by_id.insert(chat.id.clone(), idx);
        self.by_identifier
            .insert(irc_to_lower(&chat.identifier), idx);
        self.chats.push(chat);
        &self.chats[idx]
    }

    /// Flip group status and move the chat to a fresh identifier.
    fn reclassify(&mut self, idx: usize, chat: &mut Chat, group: bool) {
        self.by_identifier.remove(&irc_to_lower(&chat.identifier));
        chat.group = group;
        chat.joined = false;
        let identifier = self.unique_identifier(&chat.base_identifier());
        let previous = std::mem::replace(&mut chat.identifier, identifier);
        self.by_identifier.insert(irc_to_lower(&chat.identifier), idx);
        info!(from = %previous, to = %chat.identifier, group, "chat reclassified");
    }

    fn unique_identifier(&self, base: &str) -> String {
        if !self.by_identifier.contains_key(&irc_to_lower(base)) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.by_identifier.contains_key(&irc_to_lower(candidate)))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn get(&self, id: &str) -> Option<&Chat> {
        self.by_id.get(id).map(|&idx| &self.chats[idx])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Chat> {
        self.by_id.get(id).map(|&idx| &mut self.chats[idx])
    }

    /// Case-insensitive lookup by IRC identifier.
    pub fn by_identifier(&self, identifier: &str) -> Option<&Chat> {
        self.by_identifier
            .get(&irc_to_lower(identifier))
            .map(|&idx| &self.chats[idx])
    }

    pub fn by_identifier_mut(&mut self, identifier: &str) -> Option<&mut Chat> {
        self.by_identifier
            .get(&irc_to_lower(identifier))
            .map(|&idx| &mut self.chats[idx])
    }

    /// Identifiers of every chat currently shown as joined.
    pub fn joined(&self) -> impl Iterator<Item = &str> {
        self.chats
            .iter()
            .filter(|c| c.joined)
            .map(|c| c.identifier.as_str())
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}
