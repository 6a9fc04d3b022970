//! Test IRC client.

use slirc_wire::{Command, Message};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl TestClient {
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Send a raw IRC line.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn send(&mut self, cmd: Command) -> anyhow::Result<()> {
        self.send_raw(&Message::from(cmd).to_string()).await
    }

    /// Receive one line, without its line ending.
    pub async fn recv_line(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        let read = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(line.trim_end().to_string())
    }

    /// Whether the server closed the connection within `dur`.
    pub async fn closed_within(&mut self, dur: Duration) -> bool {
        let mut line = String::new();
        loop {
            line.clear();
            match timeout(dur, self.reader.read_line(&mut line)).await {
                Ok(Ok(0)) | Ok(Err(_)) => return true,
                Ok(Ok(_)) => continue,
                Err(_) => return false,
            }
        }
    }

    /// Send PASS and NICK, and wait for the two welcome lines.
    pub async fn register(&mut self, nick: &str, number: &str) -> anyhow::Result<()> {
        self.send(Command::PASS(number.to_string())).await?;
        self.send(Command::NICK(nick.to_string())).await?;

        let welcome = self.recv_line().await?;
        if !welcome.contains(" 001 ") {
            anyhow::bail!("Registration failed: expected 001, got {welcome:?}");
        }
        let second = self.recv_line().await?;
        if !second.contains(" 002 ") {
            anyhow::bail!("Registration failed: expected 002, got {second:?}");
        }
        Ok(())
    }
}
