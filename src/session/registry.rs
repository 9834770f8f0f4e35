//! PeerRegistry - identifier-to-connection lookup tables
//!
//! Two concurrent tables, one per peer class, selected by the identifier's
//! prefix. Registration is last-writer-wins per key; entries are never
//! proactively removed. A superseded handle stays usable by whoever still
//! holds a clone, it is just no longer reachable through the registry.

use dashmap::DashMap;
use tracing::debug;

use crate::common::{PeerClass, PeerId};

use super::PeerHandle;

/// Concurrent mapping from peer identifier to live connection handle
#[derive(Default)]
pub struct PeerRegistry {
    clients: DashMap<PeerId, PeerHandle>,
    servers: DashMap<PeerId, PeerHandle>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, class: PeerClass) -> &DashMap<PeerId, PeerHandle> {
        match class {
            PeerClass::Client => &self.clients,
            PeerClass::Server => &self.servers,
        }
    }

    /// Store or overwrite the handle for a peer (last-writer-wins)
    pub fn register(&self, peer: &PeerId, handle: PeerHandle) {
        let class = peer.class();
        self.table(class).insert(peer.clone(), handle);
        debug!("registry: registered {} {}", class, peer);
    }

    /// Look up the current handle for a peer
    pub fn lookup(&self, peer: &PeerId) -> Option<PeerHandle> {
        self.table(peer.class()).get(peer).map(|h| h.value().clone())
    }

    /// Snapshot of registered identifiers in one class (introspection only)
    pub fn peer_ids(&self, class: PeerClass) -> Vec<PeerId> {
        self.table(class).iter().map(|e| e.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{IntoStream, PeerClass};
    use std::sync::Arc;

    fn handle(id: &str) -> PeerHandle {
        let (local, _remote) = tokio::io::duplex(64);
        PeerHandle::new(PeerId::from(id), local.into_stream())
    }

    #[tokio::test]
    async fn test_register_partitions_by_class() {
        let registry = PeerRegistry::new();
        registry.register(&PeerId::from("c1"), handle("c1"));
        registry.register(&PeerId::from("server-1"), handle("server-1"));

        assert_eq!(registry.peer_ids(PeerClass::Client), vec![PeerId::from("c1")]);
        assert_eq!(
            registry.peer_ids(PeerClass::Server),
            vec![PeerId::from("server-1")]
        );
    }

    #[tokio::test]
    async fn test_lookup_finds_registered_handle() {
        let registry = PeerRegistry::new();
        assert!(registry.lookup(&PeerId::from("c1")).is_none());

        registry.register(&PeerId::from("c1"), handle("c1"));
        let found = registry.lookup(&PeerId::from("c1")).unwrap();
        assert_eq!(found.peer().as_str(), "c1");
    }

    #[tokio::test]
    async fn test_register_does_not_affect_other_keys() {
        let registry = PeerRegistry::new();
        let h1 = handle("c1");
        registry.register(&PeerId::from("c1"), h1.clone());
        registry.register(&PeerId::from("c2"), handle("c2"));

        let found = registry.lookup(&PeerId::from("c1")).unwrap();
        assert!(found.same_connection(&h1));
    }

    #[tokio::test]
    async fn test_register_is_last_writer_wins() {
        let registry = PeerRegistry::new();
        let h1 = handle("c1");
        let h2 = handle("c1");
        registry.register(&PeerId::from("c1"), h1.clone());
        registry.register(&PeerId::from("c1"), h2.clone());

        let found = registry.lookup(&PeerId::from("c1")).unwrap();
        assert!(found.same_connection(&h2));
        assert!(!found.same_connection(&h1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_register_and_lookup() {
        let registry = Arc::new(PeerRegistry::new());

        let mut tasks = Vec::new();
        for i in 0..16 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let id = PeerId::from(format!("c{}", i % 4));
                for _ in 0..100 {
                    registry.register(&id, {
                        let (local, _remote) = tokio::io::duplex(64);
                        PeerHandle::new(id.clone(), local.into_stream())
                    });
                    let found = registry.lookup(&id).unwrap();
                    assert_eq!(found.peer(), &id);
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(registry.peer_ids(PeerClass::Client).len(), 4);
    }
}
