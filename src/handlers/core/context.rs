//! Handler context and the `Handler` trait.

use async_trait::async_trait;
use slirc_wire::{Message, Prefix, Response};
use tokio::sync::mpsc;

use crate::blob::BlobStore;
use crate::bridge::BridgeClient;
pub use crate::error::{HandlerError, HandlerResult};
use crate::handlers::helpers::{server_reply, status_notice};
use crate::state::SessionState;

/// Everything a handler may touch while processing one command or event.
///
/// Built per dispatch by the session task, which owns all of it.
pub struct Context<'a> {
    /// Name used as the prefix of server replies.
    pub server_name: &'a str,
    /// Session state, including the chat directory.
    pub state: &'a mut SessionState,
    /// Queue drained by the socket writer task.
    pub sender: &'a mpsc::Sender<Message>,
    pub bridge: &'a dyn BridgeClient,
    pub blobs: &'a dyn BlobStore,
}

impl<'a> Context<'a> {
    pub fn new(
        server_name: &'a str,
        state: &'a mut SessionState,
        sender: &'a mpsc::Sender<Message>,
        bridge: &'a dyn BridgeClient,
        blobs: &'a dyn BlobStore,
    ) -> Self {
        Self {
            server_name,
            state,
            sender,
            bridge,
            blobs,
        }
    }

    /// Queue a message for the client.
    #[inline]
    pub async fn send(&self, msg: Message) -> Result<(), mpsc::error::SendError<Message>> {
        self.sender.send(msg).await
    }

    /// Build and send a server reply in one call.
    #[inline]
    pub async fn send_reply(&self, response: Response, params: Vec<String>) -> HandlerResult {
        let reply = server_reply(self.server_name, response, params);
        self.sender.send(reply).await?;
        Ok(())
    }

    /// Send a line from the `status` pseudo-user to the client.
    pub async fn status(&self, text: impl Into<String>) -> Result<(), mpsc::error::SendError<Message>> {
        let notice = status_notice(self.state.nick_or_star(), text);
        self.sender.send(notice).await
    }

    pub fn server_prefix(&self) -> Prefix {
        Prefix::ServerName(self.server_name.to_string())
    }
}

/// A handler for one IRC command.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult;
}
