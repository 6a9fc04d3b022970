//! In-memory collaborators and a context harness for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use slirc_wire::Message;
use tokio::sync::mpsc;

use super::core::Context;
use crate::blob::{BlobError, BlobStore};
use crate::bridge::{BridgeClient, BridgeCommand, BridgeError};
use crate::state::SessionState;

#[derive(Default)]
pub struct FakeBridge {
    pub sent: Mutex<Vec<BridgeCommand>>,
    pub fail: bool,
    pub shutdowns: Mutex<u32>,
}

impl FakeBridge {
    pub fn commands(&self) -> Vec<BridgeCommand> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BridgeClient for FakeBridge {
    async fn send(&self, command: BridgeCommand) -> Result<(), BridgeError> {
        if self.fail {
            return Err(BridgeError::Closed);
        }
        self.sent.lock().unwrap().push(command);
        Ok(())
    }

    async fn shutdown(&self) {
        *self.shutdowns.lock().unwrap() += 1;
    }
}

/// Blob store keeping everything in memory, returning `blob://<name>`.
#[derive(Default)]
pub struct MemoryBlobs {
    pub stored: Mutex<Vec<(String, Vec<u8>)>>,
    pub fail: bool,
}

impl MemoryBlobs {
    pub fn names(&self) -> Vec<String> {
        self.stored
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobs {
    async fn store(&self, name: &str, data: &[u8]) -> Result<String, BlobError> {
        if self.fail {
            return Err(BlobError::Io(std::io::Error::other("disk full")));
        }
        self.stored
            .lock()
            .unwrap()
            .push((name.to_string(), data.to_vec()));
        Ok(format!("blob://{name}"))
    }
}

pub struct Harness {
    pub state: SessionState,
    pub bridge: FakeBridge,
    pub blobs: MemoryBlobs,
    tx: mpsc::Sender<Message>,
    rx: Option<mpsc::Receiver<Message>>,
}

impl Harness {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(256);
        Self {
            state: SessionState::new(),
            bridge: FakeBridge::default(),
            blobs: MemoryBlobs::default(),
            tx,
            rx: Some(rx),
        }
    }

    /// Harness whose session already passed NICK and PASS.
    pub fn welcomed(nick: &str, number: &str) -> Self {
        let mut h = Self::new();
        h.state.set_nick(nick.to_string());
        h.state.set_identity(number.to_string());
        h.state.try_welcome();
        h
    }

    pub fn ctx(&mut self) -> Context<'_> {
        Context::new(
            "whapp-irc",
            &mut self.state,
            &self.tx,
            &self.bridge,
            &self.blobs,
        )
    }

    /// Lines queued for the client so far, without CRLF.
    pub fn drain(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(rx) = self.rx.as_mut() {
            while let Ok(msg) = rx.try_recv() {
                lines.push(msg.to_string().trim_end_matches("\r\n").to_string());
            }
        }
        lines
    }

    /// Drop the receiving side, as if the socket writer had died.
    pub fn close_writer(&mut self) {
        self.rx = None;
    }
}
