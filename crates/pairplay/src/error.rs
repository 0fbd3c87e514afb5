//! Unified error type for the Pairplay server.

use pairplay_protocol::ProtocolError;
use pairplay_room::RoomError;
use pairplay_transport::TransportError;

use crate::config::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `pairplay` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum PairplayError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (unavailable, swap refused, membership).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// Invalid or unreadable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairplay_protocol::RoomCode;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::OriginRejected("https://evil.example".into());
        let pairplay_err: PairplayError = err.into();
        assert!(matches!(pairplay_err, PairplayError::Transport(_)));
        assert!(pairplay_err.to_string().contains("https://evil.example"));
    }

    #[test]
    fn test_from_protocol_error() {
        let json_err = serde_json::from_str::<u8>("nope").unwrap_err();
        let pairplay_err: PairplayError = ProtocolError::Decode(json_err).into();
        assert!(matches!(pairplay_err, PairplayError::Protocol(_)));
    }

    #[test]
    fn test_from_room_error_keeps_message() {
        let err = RoomError::Unavailable(RoomCode::new("AB3K"));
        let message = err.to_string();
        let pairplay_err: PairplayError = err.into();
        assert!(matches!(pairplay_err, PairplayError::Room(_)));
        assert_eq!(pairplay_err.to_string(), message);
    }

    #[test]
    fn test_from_config_error() {
        let err = ConfigError::Invalid("code length must be at least 1".into());
        let pairplay_err: PairplayError = err.into();
        assert!(matches!(pairplay_err, PairplayError::Config(_)));
    }
}
