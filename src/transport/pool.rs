//! Connection Pool - lazy outbound connections to destination peers
//!
//! Resolution order: the registry first (reuse whatever connection the peer
//! already has, inbound or outbound), then a fresh dial to the peer's
//! identifier on the fixed outbound port. New connections are registered so
//! later lookups hit the fast path.
//!
//! Concurrent calls for the same identifier share a single in-flight dial:
//! the first caller installs a shared future keyed by identifier, later
//! callers await the same future, and every caller observes the same
//! outcome. The entry is removed once the dial resolves, so a dead
//! connection is redialed on the next call.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use tracing::debug;

use crate::common::{Address, PeerId, Result};
use crate::error::Error;
use crate::session::{PeerHandle, PeerRegistry};

use super::Transport;

/// Outcome shared between concurrent callers. The error side is the dial
/// failure rendered to text, since `Error` itself is not cloneable.
type DialOutcome = std::result::Result<PeerHandle, String>;

type DialFuture = Shared<BoxFuture<'static, DialOutcome>>;

/// Pool of reusable outbound connections, keyed by peer identifier
pub struct ConnectionPool {
    registry: Arc<PeerRegistry>,
    transport: Arc<dyn Transport>,
    /// Fixed outbound port shared by every destination
    port: u16,
    /// In-flight dials, at most one per identifier
    dials: DashMap<PeerId, DialFuture>,
}

impl ConnectionPool {
    pub fn new(registry: Arc<PeerRegistry>, transport: Arc<dyn Transport>, port: u16) -> Self {
        Self {
            registry,
            transport,
            port,
            dials: DashMap::new(),
        }
    }

    /// Return the registered connection for a peer, or dial a new one.
    ///
    /// The liveness check before reuse is best-effort: the stream can still
    /// fail between this check and the caller's write, which then surfaces
    /// as a write/read error rather than a pool failure.
    pub async fn get_or_create(&self, peer: &PeerId) -> Result<PeerHandle> {
        if let Some(handle) = self.registry.lookup(peer) {
            if handle.is_open() {
                return Ok(handle);
            }
            debug!("pool: connection to {} is closed, redialing", peer);
        }

        let dial = match self.dials.entry(peer.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let fut = Self::dial_peer(
                    self.transport.clone(),
                    self.registry.clone(),
                    peer.clone(),
                    self.port,
                )
                .boxed()
                .shared();
                entry.insert(fut.clone());
                fut
            }
        };

        let outcome = dial.clone().await;
        // Clear only our own dial. A caller woken late from an old dial
        // must not delete a newer in-flight entry for the same peer.
        self.dials.remove_if(peer, |_, in_flight| in_flight.ptr_eq(&dial));

        outcome.map_err(|reason| Error::Unavailable(peer.clone(), reason))
    }

    async fn dial_peer(
        transport: Arc<dyn Transport>,
        registry: Arc<PeerRegistry>,
        peer: PeerId,
        port: u16,
    ) -> DialOutcome {
        let addr = Address::domain(peer.as_str(), port);
        debug!("pool: dialing {}", addr);

        match transport.dial(&addr).await {
            Ok(stream) => {
                let handle = PeerHandle::new(peer.clone(), stream);
                registry.register(&peer, handle.clone());
                Ok(handle)
            }
            Err(e) => {
                debug!("pool: dial to {} failed: {}", addr, e);
                Err(e.to_string())
            }
        }
    }
}
