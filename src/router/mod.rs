//! Router Layer
//!
//! Responsibilities:
//! - Resolve a destination connection through the pool
//! - One write, at most one reply read, per routed message
//! - Report failures as sentinel outcomes, never as errors
//!
//! The router performs no retries and no timeouts; a route call blocks its
//! worker for the duration of one round trip.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::common::{Message, MessageCodec};
use crate::transport::ConnectionPool;

/// Sentinel reply for an unreachable destination
pub const UNAVAILABLE_REPLY: &str = "destination unavailable";

/// Sentinel reply for a destination that closed before replying
pub const NO_REPLY_REPLY: &str = "no reply from destination";

/// Sentinel reply for a transport error during the round trip
pub const FAILED_REPLY: &str = "error routing message";

/// Result of one routing attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The destination's reply line, verbatim
    Reply(String),
    /// The destination could not be dialed; nothing was written
    Unavailable,
    /// The destination accepted the write but closed before replying
    NoReply,
    /// The stream failed mid round trip
    Failed,
}

impl RouteOutcome {
    /// The line written back to the sender
    pub fn as_line(&self) -> &str {
        match self {
            RouteOutcome::Reply(line) => line,
            RouteOutcome::Unavailable => UNAVAILABLE_REPLY,
            RouteOutcome::NoReply => NO_REPLY_REPLY,
            RouteOutcome::Failed => FAILED_REPLY,
        }
    }
}

/// Routes messages to the connection registered for their destination
pub struct MessageRouter {
    pool: Arc<ConnectionPool>,
    codec: Arc<dyn MessageCodec>,
}

impl MessageRouter {
    pub fn new(pool: Arc<ConnectionPool>, codec: Arc<dyn MessageCodec>) -> Self {
        Self { pool, codec }
    }

    /// Forward one message to its destination and relay one reply line.
    ///
    /// Exactly one outbound write and at most one reply read happen per
    /// call. Round trips to the same destination are serialized by the
    /// handle, so a reply always belongs to the request that preceded it.
    pub async fn route(&self, message: &Message) -> RouteOutcome {
        let handle = match self.pool.get_or_create(&message.target).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!("router: {}", e);
                return RouteOutcome::Unavailable;
            }
        };

        let line = match self.codec.encode(message) {
            Ok(line) => line,
            Err(e) => {
                warn!("router: failed to encode message for {}: {}", message.target, e);
                return RouteOutcome::Failed;
            }
        };

        match handle.request(&line).await {
            Ok(Some(reply)) => {
                debug!("router: {} -> {} replied", message.sender, message.target);
                RouteOutcome::Reply(reply)
            }
            Ok(None) => {
                debug!("router: {} closed without replying", message.target);
                RouteOutcome::NoReply
            }
            Err(e) => {
                warn!("router: round trip to {} failed: {}", message.target, e);
                RouteOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Address, IntoStream, JsonCodec, PeerId, Result, Stream};
    use crate::error::Error;
    use crate::session::{PeerHandle, PeerRegistry};
    use crate::transport::{Listener, Transport};
    use async_trait::async_trait;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    /// Transport whose every dial is refused
    struct RefusingTransport;

    #[async_trait]
    impl Transport for RefusingTransport {
        async fn dial(&self, addr: &Address) -> Result<Stream> {
            Err(Error::Transport(format!("{} refused", addr)))
        }

        async fn bind(&self, _addr: &Address) -> Result<Box<dyn Listener>> {
            Err(Error::Config("cannot bind".into()))
        }
    }

    fn router_with_registry() -> (MessageRouter, Arc<PeerRegistry>) {
        let registry = Arc::new(PeerRegistry::new());
        let pool = Arc::new(ConnectionPool::new(
            registry.clone(),
            Arc::new(RefusingTransport),
            6003,
        ));
        (MessageRouter::new(pool, Arc::new(JsonCodec)), registry)
    }

    #[tokio::test]
    async fn test_unreachable_destination_is_unavailable() {
        let (router, _registry) = router_with_registry();
        let msg = Message::new("c1", "server-1", "ping");

        let outcome = router.route(&msg).await;
        assert_eq!(outcome, RouteOutcome::Unavailable);
        assert_eq!(outcome.as_line(), UNAVAILABLE_REPLY);
    }

    #[tokio::test]
    async fn test_round_trip_relays_reply() {
        let (router, registry) = router_with_registry();
        let peer = PeerId::from("server-1");

        let (local, remote) = tokio::io::duplex(1024);
        registry.register(&peer, PeerHandle::new(peer.clone(), local.into_stream()));

        // Destination echoes one line back
        let destination = tokio::spawn(async move {
            let mut reader = BufReader::new(remote);
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            let frame: Message = serde_json::from_str(line.trim_end()).unwrap();
            assert_eq!(frame.message, "ping");
            reader.get_mut().write_all(b"echoed: ping\n").await.unwrap();
        });

        let msg = Message::new("c1", "server-1", "ping");
        let outcome = router.route(&msg).await;
        assert_eq!(outcome, RouteOutcome::Reply("echoed: ping".to_string()));
        destination.await.unwrap();
    }

    #[tokio::test]
    async fn test_destination_closing_without_reply_is_no_reply() {
        let (router, registry) = router_with_registry();
        let peer = PeerId::from("server-1");

        let (local, remote) = tokio::io::duplex(1024);
        registry.register(&peer, PeerHandle::new(peer.clone(), local.into_stream()));

        // Destination consumes the frame and disconnects
        let destination = tokio::spawn(async move {
            let mut reader = BufReader::new(remote);
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
        });

        let msg = Message::new("c1", "server-1", "ping");
        let outcome = router.route(&msg).await;
        assert_eq!(outcome, RouteOutcome::NoReply);
        assert_ne!(RouteOutcome::NoReply.as_line(), RouteOutcome::Unavailable.as_line());
        destination.await.unwrap();
    }
}
