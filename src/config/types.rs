//! Core configuration types.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::defaults::{
    default_blob_base_url, default_blob_max_size, default_blob_path, default_listen_address,
    default_max_event_bytes, default_max_line_length, default_send_queue, default_server_name,
};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub listen: ListenConfig,
    /// How to start the bridge for each session.
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub blobs: BlobConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Server identity.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Prefix of server replies (e.g. `:whapp-irc 001 ...`).
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

/// IRC listener.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:6060").
    #[serde(default = "default_listen_address")]
    pub address: SocketAddr,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_listen_address(),
        }
    }
}

/// Bridge process, spawned once per IRC connection.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Executable to run.
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment variables for the bridge.
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Maximum length of one event line on the bridge's stdout.
    #[serde(default = "default_max_event_bytes")]
    pub max_event_bytes: usize,
}

/// Blob storage for QR codes and attachments.
#[derive(Debug, Clone, Deserialize)]
pub struct BlobConfig {
    /// Directory blobs are written to.
    #[serde(default = "default_blob_path")]
    pub path: String,
    /// Public URL prefix under which blobs are reachable.
    #[serde(default = "default_blob_base_url")]
    pub base_url: String,
    #[serde(default = "default_blob_max_size")]
    pub max_size: usize,
    /// Serve the blob directory over HTTP on this address.
    #[serde(default)]
    pub http: Option<SocketAddr>,
}

impl BlobConfig {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            path: default_blob_path(),
            base_url: default_blob_base_url(),
            max_size: default_blob_max_size(),
            http: None,
        }
    }
}

/// Per-connection limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Longest IRC line accepted from the client, tags included.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Outgoing IRC messages buffered before writers wait.
    #[serde(default = "default_send_queue")]
    pub send_queue: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            send_queue: default_send_queue(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [bridge]
            command = "node"
            args = ["bridge.js"]
            "#,
        )
        .unwrap();

        assert_eq!(config.server.name, "whapp-irc");
        assert_eq!(config.listen.address.port(), 6060);
        assert_eq!(config.bridge.args, vec!["bridge.js"]);
        assert_eq!(config.blobs.base_url, "http://localhost:3000");
        assert!(config.blobs.http.is_none());
        assert_eq!(config.limits.send_queue, 1024);
    }

    #[test]
    fn full_config_parses() {
        let config = Config::parse(
            r#"
            [server]
            name = "gateway.local"

            [listen]
            address = "0.0.0.0:6667"

            [bridge]
            command = "/usr/bin/bridge"
            env = { HEADLESS = "1" }
            max_event_bytes = 1048576

            [blobs]
            path = "/var/lib/slirc-bridge/blobs"
            base_url = "https://files.example.org/"
            max_size = 1024
            http = "127.0.0.1:3000"

            [limits]
            max_line_length = 4096
            send_queue = 16
            "#,
        )
        .unwrap();

        assert_eq!(config.server.name, "gateway.local");
        assert_eq!(config.bridge.env.get("HEADLESS").map(String::as_str), Some("1"));
        assert_eq!(config.blobs.http.map(|a| a.port()), Some(3000));
        assert_eq!(config.limits.max_line_length, 4096);
    }

    #[test]
    fn missing_bridge_is_a_parse_error() {
        assert!(matches!(Config::parse(""), Err(ConfigError::Parse(_))));
    }
}
