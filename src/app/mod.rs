//! Application Layer
//!
//! Responsibilities:
//! - Accept inbound peer connections and run per-connection workers
//! - Assemble the component graph from configuration
//! - Manage process lifecycle and shutdown

mod listener;
mod runtime;

pub use listener::MessageListener;
pub use runtime::Runtime;
