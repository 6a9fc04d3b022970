//! Connection-level commands: NICK, PASS, USER, CAP, PING, PONG and QUIT.

use async_trait::async_trait;
use slirc_wire::{Command, Message, Response};
use tracing::{debug, info};

use super::core::{Context, Handler, HandlerError, HandlerResult};

/// Send the welcome pair if NICK and PASS are both known and it wasn't sent yet.
async fn try_welcome(ctx: &mut Context<'_>) -> HandlerResult {
    let Some(nick) = ctx.state.try_welcome().map(str::to_string) else {
        return Ok(());
    };

    info!(nick = %nick, "Client welcomed");
    ctx.send_reply(
        Response::RPL_WELCOME,
        vec![
            nick.clone(),
            format!("Welcome to {}, {nick}.", ctx.server_name),
        ],
    )
    .await?;
    ctx.send_reply(Response::RPL_YOURHOST, vec![nick, "Enjoy the ride.".to_string()])
        .await
}

/// Handler for NICK command.
pub struct NickHandler;

#[async_trait]
impl Handler for NickHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::NICK(nick) = &msg.command else {
            return Err(HandlerError::NeedMoreParams);
        };
        ctx.state.set_nick(nick.clone());
        try_welcome(ctx).await
    }
}

/// Handler for PASS command. The password is the account's phone number.
pub struct PassHandler;

#[async_trait]
impl Handler for PassHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::PASS(number) = &msg.command else {
            return Err(HandlerError::NeedMoreParams);
        };
        ctx.state.set_identity(number.clone());
        try_welcome(ctx).await
    }
}

/// Handler for USER command. Accepted and ignored.
pub struct UserHandler;

#[async_trait]
impl Handler for UserHandler {
    async fn handle(&self, _ctx: &mut Context<'_>, _msg: &Message) -> HandlerResult {
        Ok(())
    }
}

/// Handler for CAP command: echoes the subcommand back.
pub struct CapHandler;

#[async_trait]
impl Handler for CapHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::CAP(args) = &msg.command else {
            return Err(HandlerError::NeedMoreParams);
        };
        let Some(sub) = args.first() else {
            return Err(HandlerError::NeedMoreParams);
        };

        let reply = Message::from(Command::CAP(vec!["*".to_string(), sub.clone()]))
            .with_prefix(ctx.server_prefix());
        ctx.send(reply).await?;
        Ok(())
    }
}

/// Handler for PING command.
pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let Command::PING(token, _) = &msg.command else {
            return Err(HandlerError::NeedMoreParams);
        };

        let pong = Message::from(Command::PONG(
            ctx.server_name.to_string(),
            Some(token.clone()),
        ))
        .with_prefix(ctx.server_prefix());
        ctx.send(pong).await?;
        Ok(())
    }
}

/// Handler for PONG command.
pub struct PongHandler;

#[async_trait]
impl Handler for PongHandler {
    async fn handle(&self, _ctx: &mut Context<'_>, _msg: &Message) -> HandlerResult {
        Ok(())
    }
}

/// Handler for QUIT command.
pub struct QuitHandler;

#[async_trait]
impl Handler for QuitHandler {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let quit_msg = match &msg.command {
            Command::QUIT(reason) => reason.clone(),
            _ => None,
        };
        debug!(nick = %ctx.state.nick_or_star(), message = ?quit_msg, "Client quit");
        Err(HandlerError::Quit(quit_msg))
    }
}
