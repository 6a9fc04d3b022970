//! Test gateway management.
//!
//! Spawns slirc-bridge with a shell script standing in for the bridge
//! process. The script waits for the first command, replays a fixed set
//! of events, then logs every further command it receives.

use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

const BRIDGE_SCRIPT: &str = r#"
read -r first
echo "$first" >> "$BRIDGE_LOG"
echo '{"event":"qr","args":[{"code":"1@integration"}]}'
echo '{"event":"ok","args":[{"id":"200@c.us"}]}'
echo '{"event":"not json'
echo '{"event":"chat","args":[{"id":"fam@g.us","name":"Family","isGroupChat":true,"participants":[{"id":"100@c.us","name":"Alice"},{"id":"200@c.us"}],"admins":["100@c.us"]}]}'
echo '{"event":"chat","args":[{"id":"100@c.us","name":"Alice","participants":[{"id":"100@c.us","name":"Alice"}]}]}'
echo '{"event":"unread-messages","args":[{"chat":{"id":"fam@g.us"},"messages":[{"sender":{"id":"100@c.us","name":"Alice"},"content":"hi all"}]},{"chat":{"id":"100@c.us"},"messages":[{"sender":{"id":"100@c.us","name":"Alice"},"content":"psst"}]}]}'
while read -r line; do
  echo "$line" >> "$BRIDGE_LOG"
done
"#;

/// A running gateway with its scratch directory.
pub struct TestServer {
    child: Child,
    port: u16,
    http_port: u16,
    dir: TempDir,
}

impl TestServer {
    /// Spawn a gateway on `port`, serving blobs on `http_port`.
    pub async fn spawn(port: u16, http_port: u16) -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let script = dir.path().join("bridge.sh");
        std::fs::write(&script, BRIDGE_SCRIPT)?;

        let config_path = dir.path().join("config.toml");
        let config = format!(
            r#"
[server]
name = "whapp-irc"

[listen]
address = "127.0.0.1:{port}"

[bridge]
command = "sh"
args = ["{script}"]
env = {{ BRIDGE_LOG = "{log}" }}

[blobs]
path = "{blobs}"
base_url = "http://127.0.0.1:{http_port}"
http = "127.0.0.1:{http_port}"
"#,
            script = script.display(),
            log = dir.path().join("bridge.log").display(),
            blobs = dir.path().join("blobs").display(),
        );
        std::fs::write(&config_path, config)?;

        let child = Command::new(env!("CARGO_BIN_EXE_slirc-bridge"))
            .arg(&config_path)
            .spawn()?;

        let server = Self {
            child,
            port,
            http_port,
            dir,
        };
        server.wait_until_ready().await?;
        Ok(server)
    }

    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Gateway failed to start within 5 seconds")
    }

    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    pub fn http_address(&self) -> String {
        format!("127.0.0.1:{}", self.http_port)
    }

    pub fn blob_dir(&self) -> PathBuf {
        self.dir.path().join("blobs")
    }

    /// Wait until the bridge has logged at least `count` commands.
    pub async fn bridge_commands(&self, count: usize) -> anyhow::Result<Vec<String>> {
        let log = self.dir.path().join("bridge.log");
        for _ in 0..50 {
            let lines: Vec<String> = std::fs::read_to_string(&log)
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect();
            if lines.len() >= count {
                return Ok(lines);
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("bridge did not receive {count} commands")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
