//! Translating bridge message groups into IRC PRIVMSG lines.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use slirc_wire::{Message, Prefix};
use tracing::{debug, warn};

use super::core::Context;
use super::join::join_chat;
use crate::blob::attachment_name;
use crate::error::RelayError;
use crate::state::{ChatMessage, MessageGroup};

/// Relay one group of messages, in arrival order.
///
/// Group chats that aren't joined yet are joined first. Messages from
/// others in direct chats are addressed to the client's nick and appear
/// under the chat identifier, so replies route back to that chat. Everything
/// else goes to the chat identifier. Own messages appear under the client's
/// nick. Each line of a message becomes its own PRIVMSG.
pub async fn relay_group(ctx: &mut Context<'_>, group: MessageGroup) -> Result<(), RelayError> {
    let chat_id = group.chat.id;
    let (is_group, joined) = match ctx.state.chats.get(&chat_id) {
        Some(chat) => (chat.is_group(), chat.joined),
        None => return Err(RelayError::UnknownChat(chat_id)),
    };

    if is_group && !joined {
        join_chat(ctx, &chat_id).await?;
    }

    let identifier = ctx
        .state
        .chats
        .get(&chat_id)
        .map(|c| c.identifier.clone())
        .ok_or_else(|| RelayError::UnknownChat(chat_id.clone()))?;
    let nick = ctx.state.nick_or_star().to_string();
    let identity = ctx.state.identity().map(str::to_string);

    for message in group.messages {
        let own = message.is_own(identity.as_deref());
        let sender = if own {
            nick.clone()
        } else if is_group {
            message.sender.safe_name()
        } else {
            identifier.clone()
        };
        let target = if is_group || own { &identifier } else { &nick };

        let text = match message.attachment() {
            Some(filename) => match store_attachment(ctx, &message, filename).await? {
                Some(text) => text,
                None => continue,
            },
            None => message.content,
        };

        debug!(from = %message.sender.full_name(), to = %target, "Relaying message");
        for line in lines(&text) {
            let privmsg = Message::privmsg(target.as_str(), line).with_prefix(Prefix::nick(&sender));
            ctx.send(privmsg).await?;
        }
    }
    Ok(())
}

/// Split on `\r\n`, `\n` or a lone `\r`.
fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Decode and store an attachment, returning the text to relay in its place.
///
/// `None` means the message is skipped.
async fn store_attachment(
    ctx: &Context<'_>,
    message: &ChatMessage,
    filename: &str,
) -> Result<Option<String>, RelayError> {
    let data = match STANDARD.decode(message.content.trim()) {
        Ok(data) => data,
        Err(e) => {
            warn!(filename = %filename, error = %e, "Skipping attachment with invalid base64");
            return Ok(None);
        }
    };

    let name = attachment_name(&data, filename);
    match ctx.blobs.store(&name, &data).await {
        Ok(reference) => Ok(Some(match message.caption() {
            Some(caption) => format!("{reference} {caption}"),
            None => reference,
        })),
        Err(e) => {
            warn!(filename = %filename, error = %e, "Failed to store attachment");
            ctx.status(format!("failed to store attachment {filename}: {e}"))
                .await?;
            Ok(None)
        }
    }
}
