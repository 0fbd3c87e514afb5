//! Codec trait and implementations for serializing/deserializing events.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The server doesn't care HOW events are serialized; it only needs
//! something that implements [`Codec`].
//!
//! Currently we provide [`JsonCodec`], which is what browser clients
//! speak.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because one codec is shared by every
/// connection task on the Tokio thread pool.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use pairplay_protocol::{ClientEvent, Codec, JsonCodec, RoomCode};
///
/// let codec = JsonCodec;
///
/// let event: ClientEvent = codec.decode(br#"{"event":"join-room","data":" ab3k "}"#).unwrap();
/// assert_eq!(event, ClientEvent::JoinRoom(RoomCode::new("AB3K")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Role, RoomCode, ServerEvent};

    #[test]
    fn test_encode_server_event_is_utf8_json() {
        let bytes = JsonCodec
            .encode(&ServerEvent::RoomCreated {
                room_code: RoomCode::new("AB3K"),
                role: Role::White,
            })
            .unwrap();
        let text = std::str::from_utf8(&bytes).expect("JSON is UTF-8");
        assert_eq!(
            text,
            r#"{"event":"room-created","data":{"roomCode":"AB3K","role":"white"}}"#
        );
    }

    #[test]
    fn test_decode_garbage_returns_decode_error() {
        let result: Result<ServerEvent, _> = JsonCodec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
