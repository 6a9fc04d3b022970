//! Command handler registry and dispatch.

use std::collections::HashMap;

use slirc_wire::Message;
use tracing::{debug, Instrument};

use super::context::{Context, Handler, HandlerResult};
use crate::handlers::channel::{JoinHandler, PartHandler};
use crate::handlers::connection::{
    CapHandler, NickHandler, PassHandler, PingHandler, PongHandler, QuitHandler, UserHandler,
};
use crate::handlers::messaging::PrivmsgHandler;
use crate::telemetry::spans;

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Registry {
    /// Create a registry with every supported command registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Connection handlers
        handlers.insert("NICK", Box::new(NickHandler));
        handlers.insert("PASS", Box::new(PassHandler));
        handlers.insert("USER", Box::new(UserHandler));
        handlers.insert("CAP", Box::new(CapHandler));
        handlers.insert("PING", Box::new(PingHandler));
        handlers.insert("PONG", Box::new(PongHandler));
        handlers.insert("QUIT", Box::new(QuitHandler));

        // Chat handlers
        handlers.insert("PRIVMSG", Box::new(PrivmsgHandler));
        handlers.insert("JOIN", Box::new(JoinHandler));
        handlers.insert("PART", Box::new(PartHandler));

        Self { handlers }
    }

    /// Dispatch a message to its handler.
    ///
    /// Unknown commands are logged and ignored. Known ones are counted in
    /// the session's state.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, msg: &Message) -> HandlerResult {
        let cmd_name = msg.command.name();

        let Some((&name, handler)) = self.handlers.get_key_value(cmd_name.as_str()) else {
            debug!(command = %cmd_name, "Ignoring unsupported command");
            return Ok(());
        };
        ctx.state.record_command(name);

        let span = spans::command(&cmd_name, ctx.state.nick_or_star());
        let result = handler.handle(ctx, msg).instrument(span).await;

        if let Err(ref e) = result {
            debug!(command = %cmd_name, error = %e, code = e.error_code(), "Command error");
        }

        result
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
