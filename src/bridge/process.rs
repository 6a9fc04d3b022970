//! Bridge running as a child process speaking JSON lines on stdin/stdout.

use std::process::Stdio;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncRead;
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{mpsc, Mutex};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{debug, info, warn};

use super::{BridgeClient, BridgeCommand, BridgeError, RawEvent};
use crate::config::BridgeConfig;

/// Events buffered between the stdout reader and the session.
const EVENT_QUEUE: usize = 64;

/// Handle to a spawned bridge process.
pub struct ProcessBridge {
    child: Mutex<Option<Child>>,
    stdin: Mutex<Option<FramedWrite<ChildStdin, LinesCodec>>>,
}

impl ProcessBridge {
    /// Spawn the configured bridge and start reading its events.
    pub fn spawn(config: &BridgeConfig) -> Result<(Self, mpsc::Receiver<RawEvent>), BridgeError> {
        let mut child = Command::new(&config.command)
            .args(&config.args)
            .envs(&config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BridgeError::Spawn {
                command: config.command.clone(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(BridgeError::MissingPipe("stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or(BridgeError::MissingPipe("stdout"))?;

        info!(command = %config.command, pid = child.id(), "Bridge process spawned");

        let (tx, rx) = mpsc::channel(EVENT_QUEUE);
        let lines = FramedRead::new(
            stdout,
            LinesCodec::new_with_max_length(config.max_event_bytes),
        );
        tokio::spawn(read_events(lines, tx));

        Ok((
            Self {
                child: Mutex::new(Some(child)),
                stdin: Mutex::new(Some(FramedWrite::new(stdin, LinesCodec::new()))),
            },
            rx,
        ))
    }
}

/// Forward decoded events until EOF, a read error, or the receiver goes away.
///
/// Lines that are not valid event JSON are skipped.
pub(crate) async fn read_events<R>(mut lines: FramedRead<R, LinesCodec>, tx: mpsc::Sender<RawEvent>)
where
    R: AsyncRead + Unpin,
{
    // After a decode error the stream yields one `None` before it reads on.
    let mut resuming = false;
    loop {
        let line = match lines.next().await {
            Some(Ok(line)) => line,
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                warn!("Skipping overlong bridge line");
                resuming = true;
                continue;
            }
            Some(Err(LinesCodecError::Io(e))) => {
                warn!(error = %e, "Bridge read failed");
                break;
            }
            None if resuming => {
                resuming = false;
                continue;
            }
            None => break,
        };
        resuming = false;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<RawEvent>(&line) {
            Ok(event) => {
                debug!(event = %event.event, "Bridge event");
                if tx.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!(error = %e, "Skipping malformed bridge line"),
        }
    }
    debug!("Bridge event stream closed");
}

#[async_trait]
impl BridgeClient for ProcessBridge {
    async fn send(&self, command: BridgeCommand) -> Result<(), BridgeError> {
        let line = serde_json::to_string(&command)?;
        let mut guard = self.stdin.lock().await;
        let stdin = guard.as_mut().ok_or(BridgeError::Closed)?;
        stdin.send(line).await.map_err(|e| match e {
            LinesCodecError::Io(e) => BridgeError::Write(e),
            LinesCodecError::MaxLineLengthExceeded => BridgeError::Closed,
        })?;
        debug!(command = %command.command, "Bridge command sent");
        Ok(())
    }

    async fn shutdown(&self) {
        // Closing stdin lets a well-behaved bridge exit on its own.
        self.stdin.lock().await.take();

        let Some(mut child) = self.child.lock().await.take() else {
            return;
        };
        if let Err(e) = child.kill().await {
            warn!(error = %e, "Failed to kill bridge process");
        } else {
            info!("Bridge process stopped");
        }
    }
}
