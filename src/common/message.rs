//! Message - the wire model for routed frames
//!
//! One frame on the wire is one JSON object followed by a newline. Only the
//! destination identifier matters to the router; the remaining fields are
//! advisory and carried through untouched.

use serde::{Deserialize, Serialize};

use super::PeerId;

/// A routable message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier of the sending peer
    #[serde(rename = "clientId")]
    pub sender: PeerId,

    /// Identifier of the destination peer (required for routing)
    #[serde(rename = "targetIp")]
    pub target: PeerId,

    /// Free-text payload
    pub message: String,

    /// Originating server identifier, if any
    #[serde(rename = "serverId", skip_serializing_if = "Option::is_none")]
    pub server_id: Option<i32>,

    /// Message type tag
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Creation timestamp (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    /// Create a new message, stamped with the current time
    pub fn new(sender: impl Into<PeerId>, target: impl Into<PeerId>, payload: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            target: target.into(),
            message: payload.into(),
            server_id: None,
            kind: None,
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    /// Builder: set the message type tag
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Builder: set the originating server identifier
    pub fn with_server_id(mut self, server_id: i32) -> Self {
        self.server_id = Some(server_id);
        self
    }
}
