//! Connection - one IRC client paired with one bridge session.
//!
//! ```text
//!   client socket ──FramedRead──┐
//!                               ├──▶ tokio::select! ──▶ [Handlers] ──▶ outgoing queue ──▶ writer task ──▶ client socket
//!   bridge events ──mpsc────────┘
//! ```
//!
//! The session task owns all state. The writer task only drains the queue;
//! when it fails it cancels a token the session loop watches. On exit the
//! queue is closed, the writer flushed, and the bridge shut down exactly once.

mod error_handling;
mod event_loop;

pub use event_loop::ExitReason;
use event_loop::{run_loop, write_loop, LoopParts};

use std::sync::Arc;

use slirc_wire::IrcCodec;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::blob::BlobStore;
use crate::bridge::{BridgeClient, RawEvent};
use crate::config::Config;
use crate::handlers::Registry;
use crate::state::SessionState;

/// Per-session settings taken from the configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub server_name: String,
    pub max_line_length: usize,
    pub send_queue: usize,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            server_name: config.server.name.clone(),
            max_line_length: config.limits.max_line_length,
            send_queue: config.limits.send_queue,
        }
    }
}

/// Collaborators shared by every session the gateway starts.
#[derive(Clone)]
pub struct Shared {
    pub registry: Arc<Registry>,
    pub blobs: Arc<dyn BlobStore>,
    pub settings: Arc<SessionSettings>,
}

/// A client connection and the bridge started for it.
pub struct Connection<R, W> {
    reader: R,
    writer: W,
    bridge: Arc<dyn BridgeClient>,
    events: mpsc::Receiver<RawEvent>,
    shared: Shared,
    shutdown: CancellationToken,
}

impl<R, W> Connection<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(
        reader: R,
        writer: W,
        bridge: Arc<dyn BridgeClient>,
        events: mpsc::Receiver<RawEvent>,
        shared: Shared,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            reader,
            writer,
            bridge,
            events,
            shared,
            shutdown,
        }
    }

    /// Run the session until the client, the bridge, or the gateway ends it.
    pub async fn run(self) -> ExitReason {
        let Self {
            reader,
            writer,
            bridge,
            mut events,
            shared,
            shutdown,
        } = self;
        let settings = &shared.settings;

        let (outgoing, queue) = mpsc::channel(settings.send_queue);
        let writer_failed = CancellationToken::new();
        let writer_task = tokio::spawn(write_loop(
            FramedWrite::new(writer, IrcCodec::default()),
            queue,
            writer_failed.clone(),
        ));

        let mut reader = FramedRead::new(reader, IrcCodec::with_max_len(settings.max_line_length));
        let mut state = SessionState::new();

        let parts = LoopParts {
            server_name: &settings.server_name,
            registry: &shared.registry,
            bridge: bridge.as_ref(),
            blobs: shared.blobs.as_ref(),
            outgoing: &outgoing,
            writer_failed: &writer_failed,
            shutdown: &shutdown,
        };
        let reason = run_loop(parts, &mut state, &mut reader, &mut events).await;
        info!(reason = ?reason, nick = %state.nick_or_star(), "Session ending");

        // No output past this point.
        state.close();
        drop(outgoing);
        if let Err(e) = writer_task.await {
            warn!(error = %e, "Writer task panicked");
        }
        bridge.shutdown().await;

        debug!(
            commands = ?state.command_stats(),
            chats = state.chats.len(),
            "Session closed"
        );
        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{FakeBridge, MemoryBlobs};
    use futures_util::StreamExt;
    use serde_json::json;
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, DuplexStream, ReadHalf, WriteHalf};
    use tokio::task::JoinHandle;
    use tokio_util::codec::LinesCodec;

    struct Rig {
        lines: FramedRead<ReadHalf<DuplexStream>, LinesCodec>,
        input: WriteHalf<DuplexStream>,
        events: Option<mpsc::Sender<RawEvent>>,
        bridge: Arc<FakeBridge>,
        shutdown: CancellationToken,
        task: JoinHandle<ExitReason>,
    }

    impl Rig {
        fn start() -> Self {
            let (client, server) = tokio::io::duplex(64 * 1024);
            let (server_read, server_write) = tokio::io::split(server);
            let (client_read, client_write) = tokio::io::split(client);
            let (event_tx, event_rx) = mpsc::channel(16);
            let bridge = Arc::new(FakeBridge::default());
            let shutdown = CancellationToken::new();
            let shared = Shared {
                registry: Arc::new(Registry::new()),
                blobs: Arc::new(MemoryBlobs::default()),
                settings: Arc::new(SessionSettings {
                    server_name: "whapp-irc".into(),
                    max_line_length: 512,
                    send_queue: 64,
                }),
            };
            let connection = Connection::new(
                server_read,
                server_write,
                bridge.clone(),
                event_rx,
                shared,
                shutdown.clone(),
            );
            Self {
                lines: FramedRead::new(client_read, LinesCodec::new()),
                input: client_write,
                events: Some(event_tx),
                bridge,
                shutdown,
                task: tokio::spawn(connection.run()),
            }
        }

        async fn send(&mut self, raw: &[u8]) {
            self.input.write_all(raw).await.unwrap();
        }

        async fn line(&mut self) -> String {
            tokio::time::timeout(Duration::from_secs(5), self.lines.next())
                .await
                .expect("timed out waiting for a line")
                .expect("stream ended")
                .unwrap()
        }

        async fn event(&self, event: &str, args: Vec<serde_json::Value>) {
            let raw = RawEvent {
                event: event.to_string(),
                args,
            };
            self.events.as_ref().unwrap().send(raw).await.unwrap();
        }

        async fn finish(self) -> (ExitReason, Arc<FakeBridge>) {
            let reason = tokio::time::timeout(Duration::from_secs(5), self.task)
                .await
                .expect("session did not end")
                .unwrap();
            (reason, self.bridge)
        }
    }

    async fn registered() -> Rig {
        let mut rig = Rig::start();
        rig.send(b"PASS 200\r\nNICK bob\r\n").await;
        assert_eq!(rig.line().await, ":whapp-irc 001 bob :Welcome to whapp-irc, bob.");
        assert_eq!(rig.line().await, ":whapp-irc 002 bob :Enjoy the ride.");
        rig
    }

    #[tokio::test]
    async fn registration_ping_and_client_eof() {
        let mut rig = registered().await;
        rig.send(b"PING :abc\r\n").await;
        assert_eq!(rig.line().await, ":whapp-irc PONG whapp-irc :abc");

        rig.input.shutdown().await.unwrap();
        let (reason, bridge) = rig.finish().await;
        assert_eq!(reason, ExitReason::ClientClosed);
        assert_eq!(*bridge.shutdowns.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn bridge_events_reach_the_client() {
        let mut rig = registered().await;
        rig.event("qr", vec![]).await;
        rig.event("ok", vec![json!({"id": "200@c.us"})]).await;
        assert_eq!(rig.line().await, ":status PRIVMSG bob :ok! id=200@c.us");

        rig.send(b"PRIVMSG status :`1+1`\r\n").await;
        rig.send(b"QUIT :bye\r\n").await;
        let (reason, bridge) = rig.finish().await;
        assert_eq!(reason, ExitReason::ClientQuit);
        assert_eq!(bridge.commands().len(), 1);
    }

    #[tokio::test]
    async fn missing_params_are_reported() {
        let mut rig = Rig::start();
        rig.send(b"NICK\r\n").await;
        assert_eq!(rig.line().await, ":whapp-irc 461 * NICK :Not enough parameters");
    }

    #[tokio::test]
    async fn invalid_utf8_closes_the_link() {
        let mut rig = Rig::start();
        rig.send(b"NICK \xff\xfe\r\n").await;
        assert_eq!(rig.line().await, "ERROR :Closing link: Invalid UTF-8 in message");
        let (reason, _) = rig.finish().await;
        assert_eq!(reason, ExitReason::ProtocolError);
    }

    #[tokio::test]
    async fn bridge_exit_ends_the_session() {
        let mut rig = registered().await;
        rig.events = None;
        let (reason, bridge) = rig.finish().await;
        assert_eq!(reason, ExitReason::BridgeClosed);
        assert_eq!(*bridge.shutdowns.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn gateway_shutdown_cancels_the_session() {
        let rig = Rig::start();
        rig.shutdown.cancel();
        let (reason, bridge) = rig.finish().await;
        assert_eq!(reason, ExitReason::Shutdown);
        assert_eq!(*bridge.shutdowns.lock().unwrap(), 1);
    }
}
