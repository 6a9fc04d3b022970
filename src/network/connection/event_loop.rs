//! The session's select loop and the socket writer task.

use futures_util::{SinkExt, StreamExt};
use slirc_wire::{IrcCodec, Message, ProtocolError};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error_handling::{classify_read_error, closing_link, ReadErrorAction};
use crate::blob::BlobStore;
use crate::bridge::{BridgeClient, Event, RawEvent};
use crate::handlers::{handle_event, Context, HandlerError, Registry};
use crate::state::SessionState;

/// Why a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// The client closed its end of the socket.
    ClientClosed,
    /// The client sent QUIT.
    ClientQuit,
    /// The client sent something that could not be decoded.
    ProtocolError,
    /// The socket failed on read.
    ReadFailed,
    /// The writer could no longer deliver to the client.
    WriterFailed,
    /// The bridge's event stream ended.
    BridgeClosed,
    /// The gateway is shutting down.
    Shutdown,
}

/// Drain the outgoing queue into the socket.
///
/// Runs until every sender is dropped or a write fails. A failed write
/// cancels `failed` so the session loop stops too.
pub(super) async fn write_loop<W>(
    mut sink: FramedWrite<W, IrcCodec>,
    mut outgoing: mpsc::Receiver<Message>,
    failed: CancellationToken,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(msg) = outgoing.recv().await {
        match sink.send(msg).await {
            Ok(()) => {}
            Err(ProtocolError::IllegalControlChar(ch)) => {
                warn!(char = ?ch, "Dropping outgoing line with illegal character");
            }
            Err(e) => {
                warn!(error = %e, "Write to client failed");
                failed.cancel();
                return;
            }
        }
    }
    let _ = sink.close().await;
}

/// Borrowed pieces the loop hands to every [`Context`].
pub(super) struct LoopParts<'a> {
    pub server_name: &'a str,
    pub registry: &'a Registry,
    pub bridge: &'a dyn BridgeClient,
    pub blobs: &'a dyn BlobStore,
    pub outgoing: &'a mpsc::Sender<Message>,
    pub writer_failed: &'a CancellationToken,
    pub shutdown: &'a CancellationToken,
}

/// Multiplex client lines and bridge events until one side ends.
///
/// Both sources are handled on this task, one at a time, so commands and
/// events never interleave their output.
pub(super) async fn run_loop<R>(
    parts: LoopParts<'_>,
    state: &mut SessionState,
    reader: &mut FramedRead<R, IrcCodec>,
    events: &mut mpsc::Receiver<RawEvent>,
) -> ExitReason
where
    R: AsyncRead + Unpin,
{
    loop {
        tokio::select! {
            _ = parts.shutdown.cancelled() => return ExitReason::Shutdown,
            _ = parts.writer_failed.cancelled() => return ExitReason::WriterFailed,

            frame = reader.next() => match frame {
                Some(Ok(msg)) => {
                    if let Some(reason) = on_client_message(&parts, state, &msg).await {
                        return reason;
                    }
                }
                Some(Err(e)) => return on_read_error(&parts, &e).await,
                None => {
                    info!("Client closed connection");
                    return ExitReason::ClientClosed;
                }
            },

            raw = events.recv() => match raw {
                Some(raw) => {
                    if let Some(reason) = on_bridge_event(&parts, state, raw).await {
                        return reason;
                    }
                }
                None => {
                    info!("Bridge event stream closed");
                    return ExitReason::BridgeClosed;
                }
            },
        }
    }
}

async fn on_client_message(
    parts: &LoopParts<'_>,
    state: &mut SessionState,
    msg: &Message,
) -> Option<ExitReason> {
    debug!(line = %msg.to_string().trim_end(), "Client line");

    let mut ctx = Context::new(
        parts.server_name,
        state,
        parts.outgoing,
        parts.bridge,
        parts.blobs,
    );
    let err = match parts.registry.dispatch(&mut ctx, msg).await {
        Ok(()) => return None,
        Err(err) => err,
    };

    let nick = ctx.state.nick_or_star().to_string();
    if let Some(reply) = err.to_irc_reply(parts.server_name, &nick, &msg.command.name())
        && parts.outgoing.send(reply).await.is_err()
    {
        return Some(ExitReason::WriterFailed);
    }

    match err {
        HandlerError::Quit(reason) => {
            info!(reason = ?reason, "Client quit");
            Some(ExitReason::ClientQuit)
        }
        err if err.is_fatal() => Some(ExitReason::WriterFailed),
        _ => None,
    }
}

async fn on_bridge_event(
    parts: &LoopParts<'_>,
    state: &mut SessionState,
    raw: RawEvent,
) -> Option<ExitReason> {
    let event = match Event::decode(raw) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Malformed bridge event");
            return None;
        }
    };

    let mut ctx = Context::new(
        parts.server_name,
        state,
        parts.outgoing,
        parts.bridge,
        parts.blobs,
    );
    match handle_event(&mut ctx, event).await {
        Ok(()) => None,
        Err(e) if e.is_fatal() => Some(ExitReason::WriterFailed),
        Err(e) => {
            warn!(error = %e, "Bridge event failed");
            None
        }
    }
}

async fn on_read_error(parts: &LoopParts<'_>, e: &ProtocolError) -> ExitReason {
    match classify_read_error(e) {
        ReadErrorAction::FatalProtocolError { error_msg } => {
            warn!(error = %e, "Protocol error from client");
            let _ = parts.outgoing.send(closing_link(&error_msg)).await;
            ExitReason::ProtocolError
        }
        ReadErrorAction::IoError => {
            debug!(error = %e, "Client read failed");
            ExitReason::ReadFailed
        }
    }
}
