//! Peer identifiers
//!
//! A peer is named by an opaque string. The identifier space is split into
//! two classes by a literal prefix: identifiers starting with `server-` name
//! server peers, everything else names a client. The class is a pure
//! function of the string value; no peer ever changes class.

use serde::{Deserialize, Serialize};

/// Prefix marking an identifier as server-class
const SERVER_PREFIX: &str = "server-";

/// Which registry table an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerClass {
    Client,
    Server,
}

impl std::fmt::Display for PeerClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerClass::Client => write!(f, "client"),
            PeerClass::Server => write!(f, "server"),
        }
    }
}

/// Opaque identifier naming a client or server peer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        PeerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Classify the identifier by its prefix
    pub fn class(&self) -> PeerClass {
        if self.0.starts_with(SERVER_PREFIX) {
            PeerClass::Server
        } else {
            PeerClass::Client
        }
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PeerId {
    fn from(id: &str) -> Self {
        PeerId(id.to_string())
    }
}

impl From<String> for PeerId {
    fn from(id: String) -> Self {
        PeerId(id)
    }
}
