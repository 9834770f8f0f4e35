//! Listener - inbound connection acceptance and per-connection workers
//!
//! One accept loop, one tokio task per accepted connection. Each worker
//! exclusively drives its connection's read loop: read a line, decode it,
//! register the sender so replies can find this socket later, route, and
//! write the outcome back on the same connection. Requests on one
//! connection are handled strictly in arrival order.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::common::{Address, MessageCodec, PeerId, Result};
use crate::router::MessageRouter;
use crate::session::{PeerHandle, PeerRegistry};
use crate::transport::{Listener, Transport};

/// Accepts peer connections and spawns a worker per connection
pub struct MessageListener {
    registry: Arc<PeerRegistry>,
    router: Arc<MessageRouter>,
    codec: Arc<dyn MessageCodec>,
    transport: Arc<dyn Transport>,
}

impl MessageListener {
    pub fn new(
        registry: Arc<PeerRegistry>,
        router: Arc<MessageRouter>,
        codec: Arc<dyn MessageCodec>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            registry,
            router,
            codec,
            transport,
        }
    }

    /// Bind the listen address and serve until shutdown
    pub async fn serve(
        &self,
        listen: &Address,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<()> {
        let listener = self.transport.bind(listen).await?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already-bound listener until shutdown
    pub async fn serve_on(
        &self,
        listener: Box<dyn Listener>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<()> {
        info!("listening on {}", listener.local_addr()?);

        let mut conn_count: u64 = 0;

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, source)) => {
                            conn_count += 1;
                            debug!("connection #{} accepted from {}", conn_count, source);

                            // The handle starts out labeled by its remote
                            // address; the registry keys it by the sender
                            // identifier once the first frame arrives.
                            let handle = PeerHandle::new(PeerId::from(source.to_string()), stream);
                            let registry = self.registry.clone();
                            let router = self.router.clone();
                            let codec = self.codec.clone();

                            tokio::spawn(async move {
                                handle_connection(registry, router, codec, handle, source).await;
                            });
                        }
                        Err(e) => {
                            error!("accept error: {}", e);
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("listener shutting down (handled {} connections)", conn_count);
                    return Ok(());
                }
            }
        }
    }
}

/// Per-connection worker loop. Ends on end-of-stream or a transport error
/// on this connection; neither affects other workers. The registry entry
/// for the sender is left in place on exit.
async fn handle_connection(
    registry: Arc<PeerRegistry>,
    router: Arc<MessageRouter>,
    codec: Arc<dyn MessageCodec>,
    handle: PeerHandle,
    source: Address,
) {
    loop {
        let line = match handle.read_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                debug!("connection from {} errored: {}", source, e);
                break;
            }
        };

        let message = match codec.decode(&line) {
            Ok(message) => message,
            Err(e) => {
                warn!("dropping undecodable frame from {}: {}", source, e);
                continue;
            }
        };

        registry.register(&message.sender, handle.clone());

        let outcome = router.route(&message).await;

        if let Err(e) = handle.write_line(outcome.as_line()).await {
            debug!("failed to write reply to {}: {}", source, e);
            break;
        }
    }

    debug!("connection from {} closed", source);
}
