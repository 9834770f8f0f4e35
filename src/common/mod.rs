//! Common types and abstractions
//!
//! This module defines the core types used throughout the application:
//! - Stream: unified async I/O abstraction
//! - PeerId: identifier naming a client or server peer
//! - Message: the wire model for routed frames
//! - Address: network address representation
//! - MessageCodec: frame encode/decode seam

mod address;
mod codec;
mod message;
mod peer;
mod stream;

pub use address::Address;
pub use codec::{JsonCodec, MessageCodec};
pub use message::Message;
pub use peer::{PeerClass, PeerId};
pub use stream::{IntoStream, Stream};

// Re-export error types from crate root
pub use crate::error::{Error, Result};
