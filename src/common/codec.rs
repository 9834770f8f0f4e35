//! Message codec seam
//!
//! The core treats frame encoding as an opaque, swappable dependency.
//! `JsonCodec` is the wire format actually spoken by the peers: one JSON
//! object per line, field names as defined on [`Message`].

use crate::error::{Error, Result};

use super::Message;

/// Codec between wire lines and [`Message`] values
pub trait MessageCodec: Send + Sync {
    /// Encode a message to one wire line (without the newline terminator)
    fn encode(&self, message: &Message) -> Result<String>;

    /// Decode one wire line into a message
    fn decode(&self, line: &str) -> Result<Message>;
}

/// JSON codec - the default wire format
pub struct JsonCodec;

impl MessageCodec for JsonCodec {
    fn encode(&self, message: &Message) -> Result<String> {
        serde_json::to_string(message).map_err(|e| Error::Codec(e.to_string()))
    }

    fn decode(&self, line: &str) -> Result<Message> {
        let message: Message =
            serde_json::from_str(line).map_err(|e| Error::Codec(e.to_string()))?;
        // A frame without a destination cannot be routed
        if message.target.is_empty() {
            return Err(Error::Codec("missing destination identifier".to_string()));
        }
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_maps_wire_field_names() {
        let line = r#"{"clientId":"c1","targetIp":"server-1","message":"ping"}"#;
        let msg = JsonCodec.decode(line).unwrap();
        assert_eq!(msg.sender.as_str(), "c1");
        assert_eq!(msg.target.as_str(), "server-1");
        assert_eq!(msg.message, "ping");
        assert!(msg.kind.is_none());
    }

    #[test]
    fn test_decode_optional_fields() {
        let line = r#"{"clientId":"c1","targetIp":"server-1","message":"ping","serverId":3,"type":"chat","timestamp":"2024-01-01T00:00:00Z"}"#;
        let msg = JsonCodec.decode(line).unwrap();
        assert_eq!(msg.server_id, Some(3));
        assert_eq!(msg.kind.as_deref(), Some("chat"));
    }

    #[test]
    fn test_decode_accepts_negative_server_id() {
        let line = r#"{"clientId":"c1","targetIp":"server-1","message":"ping","serverId":-1}"#;
        let msg = JsonCodec.decode(line).unwrap();
        assert_eq!(msg.server_id, Some(-1));
    }

    #[test]
    fn test_decode_rejects_missing_target() {
        assert!(JsonCodec.decode(r#"{"clientId":"c1","message":"ping"}"#).is_err());
        assert!(JsonCodec
            .decode(r#"{"clientId":"c1","targetIp":"","message":"ping"}"#)
            .is_err());
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(JsonCodec.decode("not json").is_err());
    }

    #[test]
    fn test_encode_uses_wire_field_names() {
        let msg = Message::new("c1", "server-1", "ping");
        let line = JsonCodec.encode(&msg).unwrap();
        assert!(line.contains(r#""clientId":"c1""#));
        assert!(line.contains(r#""targetIp":"server-1""#));
        assert!(!line.contains('\n'));
    }
}
