//! Error types for Courier

use thiserror::Error;

use crate::common::PeerId;

/// Main error type for Courier
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Destination {0} unavailable: {1}")]
    Unavailable(PeerId, String),
}

/// Result type alias for Courier
pub type Result<T> = std::result::Result<T, Error>;
