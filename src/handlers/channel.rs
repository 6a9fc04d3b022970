//! JOIN and PART for chats presented as channels.

use async_trait::async_trait;
use slirc_wire::{Command, Message};
use tracing::debug;

use super::core::{Context, Handler, HandlerError, HandlerResult};
use super::join::join_chat;
use crate::error::JoinError;

fn targets(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').filter(|t| !t.is_empty())
}

/// Handler for JOIN command.
pub struct JoinHandler;

#[async_trait]
impl Handler for JoinHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::JOIN(list, _) = &msg.command else {
            return Err(HandlerError::NeedMoreParams);
        };

        for target in targets(list) {
            let Some(chat_id) = ctx.state.chats.by_identifier(target).map(|c| c.id.clone()) else {
                ctx.status("chat not found").await?;
                continue;
            };

            match join_chat(ctx, &chat_id).await {
                Ok(()) => {}
                Err(JoinError::Send(e)) => return Err(e.into()),
                Err(e) => ctx.status(format!("error while joining: {e}")).await?,
            }
        }
        Ok(())
    }
}

/// Handler for PART command.
///
/// Only clears the join flag; the bridge is not told and a later group
/// message will join the chat again.
pub struct PartHandler;

#[async_trait]
impl Handler for PartHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::PART(list, _) = &msg.command else {
            return Err(HandlerError::NeedMoreParams);
        };

        for target in targets(list) {
            if let Some(chat) = ctx.state.chats.by_identifier_mut(target) {
                chat.joined = false;
                debug!(chat = %chat.identifier, "Parted chat");
                continue;
            }
            ctx.status("unknown chat").await?;
        }
        Ok(())
    }
}
