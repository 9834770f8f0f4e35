//! Transport Layer
//!
//! Responsibilities:
//! - Establish lowest-level connections (TCP)
//! - Lazily pool outbound connections to destination peers
//! - NO frame parsing, NO routing decisions
//!
//! This layer ONLY deals with raw byte transport and connection reuse.

mod pool;
mod tcp;

pub use pool::ConnectionPool;
pub use tcp::TcpTransport;

use async_trait::async_trait;

use crate::common::{Address, Result, Stream};

/// Transport trait for establishing raw connections
///
/// Implementations should ONLY handle connection establishment,
/// not framing or message handling.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Dial a remote address
    async fn dial(&self, addr: &Address) -> Result<Stream>;

    /// Create a listener bound to an address
    async fn bind(&self, addr: &Address) -> Result<Box<dyn Listener>>;
}

/// Listener trait for accepting incoming connections
#[async_trait]
pub trait Listener: Send + Sync {
    /// Accept a new connection
    async fn accept(&self) -> Result<(Stream, Address)>;

    /// Get the local bound address
    fn local_addr(&self) -> Result<Address>;
}
