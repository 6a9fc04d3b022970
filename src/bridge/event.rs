//! Typed bridge events.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::RawEvent;
use crate::state::{Chat, MessageGroup};

#[derive(Debug, Error)]
pub enum EventError {
    #[error("`{0}` event has no payload")]
    MissingPayload(&'static str),

    #[error("malformed `{event}` payload: {source}")]
    Payload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A decoded bridge event.
#[derive(Debug)]
pub enum Event {
    /// Login code to show as a QR image.
    Qr { code: String },
    /// The bridge session is logged in.
    Ready { id: String },
    /// A chat was announced or updated.
    Chat(Box<Chat>),
    /// New messages, grouped by chat.
    UnreadMessages(Vec<MessageGroup>),
    /// An event kind the gateway does not handle.
    Unknown(String),
}

#[derive(Deserialize)]
struct QrPayload {
    code: String,
}

#[derive(Deserialize)]
struct OkPayload {
    id: String,
}

fn first_payload<T: serde::de::DeserializeOwned>(
    event: &'static str,
    args: Vec<Value>,
) -> Result<T, EventError> {
    let payload = args
        .into_iter()
        .next()
        .ok_or(EventError::MissingPayload(event))?;
    serde_json::from_value(payload).map_err(|source| EventError::Payload { event, source })
}

impl Event {
    /// Decode a raw event, validating its payload against the event kind.
    pub fn decode(raw: RawEvent) -> Result<Event, EventError> {
        match raw.event.as_str() {
            "qr" => {
                let p: QrPayload = first_payload("qr", raw.args)?;
                Ok(Event::Qr { code: p.code })
            }
            "ok" => {
                let p: OkPayload = first_payload("ok", raw.args)?;
                Ok(Event::Ready { id: p.id })
            }
            "chat" => first_payload("chat", raw.args).map(|c| Event::Chat(Box::new(c))),
            "unread-messages" => {
                // Groups arrive one per argument, or as a single array argument.
                let groups = match <[Value; 1]>::try_from(raw.args) {
                    Ok([list @ Value::Array(_)]) => list,
                    Ok([single]) => Value::Array(vec![single]),
                    Err(args) => Value::Array(args),
                };
                serde_json::from_value(groups)
                    .map(Event::UnreadMessages)
                    .map_err(|source| EventError::Payload {
                        event: "unread-messages",
                        source,
                    })
            }
            _ => Ok(Event::Unknown(raw.event)),
        }
    }

    /// Event kind for logging.
    pub fn kind(&self) -> &str {
        match self {
            Event::Qr { .. } => "qr",
            Event::Ready { .. } => "ok",
            Event::Chat(_) => "chat",
            Event::UnreadMessages(_) => "unread-messages",
            Event::Unknown(kind) => kind,
        }
    }
}
