//! Gateway - TCP listener that pairs every accepted client with a bridge.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, Instrument};

use super::connection::{Connection, Shared};
use crate::bridge::ProcessBridge;
use crate::config::BridgeConfig;
use crate::telemetry::spans;

/// Accepts IRC clients and runs one session per connection.
pub struct Gateway {
    listener: TcpListener,
    bridge: Arc<BridgeConfig>,
    shared: Shared,
    next_id: AtomicU64,
}

impl Gateway {
    /// Bind the listener.
    pub async fn bind(addr: SocketAddr, bridge: BridgeConfig, shared: Shared) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "IRC listener bound");
        Ok(Self {
            listener,
            bridge: Arc::new(bridge),
            shared,
            next_id: AtomicU64::new(1),
        })
    }

    /// Accept connections until `shutdown` is cancelled.
    ///
    /// Running sessions get a child token, so they end with the gateway.
    #[instrument(skip_all, name = "gateway")]
    pub async fn run(self, shutdown: CancellationToken) -> anyhow::Result<()> {
        loop {
            let (stream, addr) = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Gateway stopping");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                        continue;
                    }
                },
            };

            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            info!(id, %addr, "Connection accepted");

            let span = spans::session(id, &addr.to_string());
            tokio::spawn(
                serve(
                    stream,
                    Arc::clone(&self.bridge),
                    self.shared.clone(),
                    shutdown.child_token(),
                )
                .instrument(span),
            );
        }
    }
}

/// Start a bridge for the client and run the session to completion.
async fn serve(
    stream: TcpStream,
    bridge_config: Arc<BridgeConfig>,
    shared: Shared,
    shutdown: CancellationToken,
) {
    let (bridge, events) = match ProcessBridge::spawn(&bridge_config) {
        Ok(spawned) => spawned,
        Err(e) => {
            error!(error = %e, "Failed to start bridge");
            return;
        }
    };

    let (reader, writer) = stream.into_split();
    let connection = Connection::new(reader, writer, Arc::new(bridge), events, shared, shutdown);
    let reason = connection.run().await;
    info!(reason = ?reason, "Connection closed");
}
