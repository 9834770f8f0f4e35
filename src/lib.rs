//! Courier - a minimal TCP message router
//!
//! Sits between many client peers and a smaller set of server peers,
//! forwarding line-delimited JSON messages by logical identifier rather
//! than by raw socket.
//!
//! # Architecture (Layered)
//!
//! ```text
//! Listener (accept, one worker per connection)
//! → Codec (line ↔ Message)
//! → Registry (identifier → connection handle)
//! → Pool (reuse or dial outbound)
//! → Router (one write, one reply read)
//! ```
//!
//! ## Core Principles
//!
//! - Each layer does ONE thing
//! - Collaborators abstracted via traits (Transport, MessageCodec)
//! - Shared state is confined to the registry and the pool, both with
//!   per-key contention only
//! - No error is process-fatal; failures stay local to one connection or
//!   one routing attempt
//!
//! ## Module Structure
//!
//! ```text
//! src/
//! ├── common/          # Core types: Stream, PeerId, Message, Address, codec
//! ├── transport/       # Transport seam: TCP, connection pool
//! ├── session/         # Peer registry and connection handles
//! ├── router/          # Message routing and sentinel outcomes
//! └── app/             # Application: Listener, Runtime
//! ```

// Core types
pub mod common;
pub mod error;

// Layered architecture
pub mod transport;
pub mod session;
pub mod router;
pub mod app;

// Supporting modules
pub mod config;

// Re-exports for convenience
pub use common::{Address, JsonCodec, Message, MessageCodec, PeerClass, PeerId, Stream};
pub use config::Config;
pub use error::{Error, Result};

// Architecture re-exports
pub use app::{MessageListener, Runtime};
pub use router::{MessageRouter, RouteOutcome};
pub use session::{PeerHandle, PeerRegistry};
pub use transport::{ConnectionPool, TcpTransport, Transport};
