//! slirc-bridge - Straylight IRC Bridge
//!
//! Lets an ordinary IRC client drive a chat-service account. Each client
//! connection gets its own bridge process; chats appear as channels, and
//! QR codes and attachments are published as links.

mod blob;
mod bridge;
mod config;
mod error;
mod handlers;
mod http;
mod network;
mod qr;
mod state;
mod telemetry;

use crate::blob::FsBlobStore;
use crate::config::{validation, Config};
use crate::handlers::Registry;
use crate::network::{Gateway, SessionSettings, Shared};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {config_path}", errors.len());
    }

    info!(
        server = %config.server.name,
        bridge = %config.bridge.command,
        "Starting slirc-bridge"
    );

    let blobs = Arc::new(
        FsBlobStore::new(
            config.blobs.path(),
            config.blobs.base_url.clone(),
            config.blobs.max_size,
        )
        .await?,
    );

    if let Some(addr) = config.blobs.http {
        let store = Arc::clone(&blobs);
        tokio::spawn(async move {
            http::run_http_server(addr, store).await;
        });
    }

    let shared = Shared {
        registry: Arc::new(Registry::new()),
        blobs,
        settings: Arc::new(SessionSettings::from_config(&config)),
    };
    let gateway = Gateway::bind(config.listen.address, config.bridge.clone(), shared).await?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for interrupt");
            return;
        }
        info!("Interrupt received, shutting down");
        signal.cancel();
    });

    gateway.run(shutdown).await
}
