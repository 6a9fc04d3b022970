//! The bridge: an external process automating the remote chat service.
//!
//! The session sends [`BridgeCommand`]s and receives [`RawEvent`]s, which
//! are decoded into typed [`Event`]s before dispatch.

mod event;
mod process;

pub use event::{Event, EventError};
pub use process::ProcessBridge;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to spawn bridge `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bridge process has no {0} pipe")]
    MissingPipe(&'static str),

    #[error("bridge write failed: {0}")]
    Write(#[from] std::io::Error),

    #[error("bridge command encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("bridge is closed")]
    Closed,
}

/// Outbound command, serialized as `{"command": ..., "args": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeCommand {
    pub command: String,
    pub args: Vec<String>,
}

impl BridgeCommand {
    /// Debug expression evaluated inside the bridge.
    pub fn eval(expr: impl Into<String>) -> Self {
        Self {
            command: "eval".to_string(),
            args: vec![expr.into()],
        }
    }

    /// Send `text` to the chat with bridge ID `chat_id`.
    pub fn send(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            command: "send".to_string(),
            args: vec![chat_id.into(), text.into()],
        }
    }
}

/// Inbound event as framed by the bridge, payloads still untyped.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub event: String,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

/// Command side of a bridge session.
///
/// The event side is an `mpsc::Receiver<RawEvent>` handed out when the
/// bridge is started; it closes when the bridge session ends.
#[async_trait]
pub trait BridgeClient: Send + Sync {
    async fn send(&self, command: BridgeCommand) -> Result<(), BridgeError>;

    /// Release the bridge session. Called once, at session teardown.
    async fn shutdown(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_wire_format() {
        let json = serde_json::to_string(&BridgeCommand::send("1@g.us", "hi")).unwrap();
        assert_eq!(json, r#"{"command":"send","args":["1@g.us","hi"]}"#);

        let json = serde_json::to_string(&BridgeCommand::eval("1+1")).unwrap();
        assert_eq!(json, r#"{"command":"eval","args":["1+1"]}"#);
    }

    #[test]
    fn raw_event_args_default_to_empty() {
        let ev: RawEvent = serde_json::from_str(r#"{"event":"ping"}"#).unwrap();
        assert_eq!(ev.event, "ping");
        assert!(ev.args.is_empty());
    }
}
