//! Error types for the protocol layer.
//!
//! Each crate in Pairplay defines its own error enum. A `ProtocolError`
//! always means the problem is in turning events into bytes or back,
//! never in networking or room bookkeeping.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, an unknown `event` name, or a
    /// payload of the wrong shape.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
