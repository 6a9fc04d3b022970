//! Presenting a group chat as a joined IRC channel.

use slirc_wire::{Command, Message, Prefix, Response};
use tracing::debug;

use super::core::Context;
use super::helpers::server_reply;
use crate::error::JoinError;

/// Emit the JOIN burst for the chat with bridge ID `chat_id` and mark it joined.
///
/// The burst is, in order: JOIN from the client's nick, the topic (332),
/// `MODE +o` for the client if its own contact is an admin, the names list
/// (353) with `@` for admins, and end-of-names (366). Already-joined chats
/// are a no-op. The chat is only marked joined once every line is queued.
pub async fn join_chat(ctx: &mut Context<'_>, chat_id: &str) -> Result<(), JoinError> {
    let burst = {
        let chat = ctx.state.chats.get(chat_id).ok_or(JoinError::NoChat)?;
        if !chat.is_group() {
            return Err(JoinError::NotGroupChat(chat.identifier.clone()));
        }
        if chat.joined {
            return Ok(());
        }

        let nick = ctx.state.nick_or_star();
        let identity = ctx.state.identity();
        let ident = chat.identifier.as_str();

        let mut burst = vec![
            Message::join(ident).with_prefix(Prefix::nick(nick)),
            server_reply(
                ctx.server_name,
                Response::RPL_TOPIC,
                vec![nick.to_string(), ident.to_string(), chat.name.clone()],
            ),
        ];

        let mut names = Vec::with_capacity(chat.participants.len());
        for contact in &chat.participants {
            if contact.is_self(identity) {
                if contact.is_admin {
                    burst.push(
                        Message::from(Command::MODE(
                            ident.to_string(),
                            vec!["+o".to_string(), nick.to_string()],
                        ))
                        .with_prefix(ctx.server_prefix()),
                    );
                }
                continue;
            }

            let prefix = if contact.is_admin { "@" } else { "" };
            names.push(format!("{prefix}{}", contact.safe_name()));
        }

        burst.push(server_reply(
            ctx.server_name,
            Response::RPL_NAMREPLY,
            vec![
                nick.to_string(),
                "@".to_string(),
                ident.to_string(),
                names.join(" "),
            ],
        ));
        burst.push(server_reply(
            ctx.server_name,
            Response::RPL_ENDOFNAMES,
            vec![
                nick.to_string(),
                ident.to_string(),
                "End of /NAMES list.".to_string(),
            ],
        ));
        burst
    };

    for msg in burst {
        ctx.send(msg).await?;
    }

    if let Some(chat) = ctx.state.chats.get_mut(chat_id) {
        chat.joined = true;
        debug!(chat = %chat.identifier, "Joined chat");
    }
    Ok(())
}
