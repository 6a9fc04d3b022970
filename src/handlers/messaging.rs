//! PRIVMSG: outbound chat messages and the status debug channel.

use async_trait::async_trait;
use slirc_wire::{irc_eq, Command, Message};
use tracing::{debug, warn};

use super::core::{Context, Handler, HandlerError, HandlerResult};
use super::helpers::STATUS_NICK;
use crate::bridge::BridgeCommand;

/// Strip a `` `expr` `` wrapper, if present.
fn debug_expression(text: &str) -> Option<&str> {
    if text.len() >= 2 {
        text.strip_prefix('`')?.strip_suffix('`')
    } else {
        None
    }
}

/// Handler for PRIVMSG command.
pub struct PrivmsgHandler;

#[async_trait]
impl Handler for PrivmsgHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::PRIVMSG(target, text) = &msg.command else {
            return Err(HandlerError::NeedMoreParams);
        };

        if irc_eq(target, STATUS_NICK) {
            match debug_expression(text) {
                Some(expr) => {
                    if let Err(e) = ctx.bridge.send(BridgeCommand::eval(expr)).await {
                        warn!(error = %e, "Failed to forward eval");
                    }
                }
                None => debug!(nick = %ctx.state.nick_or_star(), text = %text, "Message to status"),
            }
            return Ok(());
        }

        let Some(chat) = ctx.state.chats.by_identifier(target) else {
            ctx.status("unknown chat").await?;
            return Ok(());
        };

        let command = BridgeCommand::send(chat.id.clone(), text.clone());
        if let Err(e) = ctx.bridge.send(command).await {
            warn!(target = %target, error = %e, "Failed to send message to bridge");
        }
        Ok(())
    }
}
