//! Runtime - configuration-driven assembly and lifecycle
//!
//! Wires registry → pool → router → listener from a [`Config`] and runs
//! the listener until Ctrl-C.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{error, info};

use crate::common::{Address, JsonCodec, MessageCodec, PeerClass, Result};
use crate::config::Config;
use crate::router::MessageRouter;
use crate::session::PeerRegistry;
use crate::transport::{ConnectionPool, TcpTransport, Transport};

use super::listener::MessageListener;

/// Runtime manages the router's lifecycle
pub struct Runtime {
    listener: Arc<MessageListener>,
    registry: Arc<PeerRegistry>,
    listen: Address,
    shutdown_tx: broadcast::Sender<()>,
}

impl Runtime {
    /// Build the runtime from configuration
    pub fn from_config(config: &Config) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let registry = Arc::new(PeerRegistry::new());
        let transport: Arc<dyn Transport> = Arc::new(TcpTransport::new());
        let codec: Arc<dyn MessageCodec> = Arc::new(JsonCodec);

        let pool = Arc::new(ConnectionPool::new(
            registry.clone(),
            transport.clone(),
            config.outbound_port,
        ));
        let router = Arc::new(MessageRouter::new(pool, codec.clone()));
        let listener = Arc::new(MessageListener::new(
            registry.clone(),
            router,
            codec,
            transport,
        ));

        Self {
            listener,
            registry,
            listen: Address::socket(config.listen),
            shutdown_tx,
        }
    }

    /// Run until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let listener = self.listener.clone();
        let listen = self.listen.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();

        let serve = tokio::spawn(async move {
            if let Err(e) = listener.serve(&listen, shutdown_rx).await {
                error!("listener error: {}", e);
            }
        });

        tokio::signal::ctrl_c().await?;
        info!("Shutting down...");
        info!(
            "registered peers at shutdown: {} clients, {} servers",
            self.registry.peer_ids(PeerClass::Client).len(),
            self.registry.peer_ids(PeerClass::Server).len()
        );

        let _ = self.shutdown_tx.send(());
        let _ = serve.await;

        Ok(())
    }
}
