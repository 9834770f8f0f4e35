//! Session Layer
//!
//! Responsibilities:
//! - Track which peer identifier owns which live connection
//! - Present one connection as a shared, line-oriented handle
//!
//! This layer does NOT decode frames or make routing decisions.

mod handle;
mod registry;

pub use handle::PeerHandle;
pub use registry::PeerRegistry;
