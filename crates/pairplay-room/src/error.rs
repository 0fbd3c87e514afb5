//! Error types for the room layer.
//!
//! The `Display` text of each variant is what a client sees in a
//! `room-error` event, so it is written for people, not logs.

use pairplay_protocol::{PlayerId, RoomCode};

/// Errors that can occur during room operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The room to join doesn't exist or already has two players.
    #[error("room {0} is unavailable: it does not exist or is already full")]
    Unavailable(RoomCode),

    /// A swap was requested but the room doesn't have exactly two players.
    #[error("cannot swap sides in room {0}: waiting for a second player")]
    SwapIneligible(RoomCode),

    /// The player is already a member of a room.
    #[error("player {0} is already in room {1}")]
    AlreadyInRoom(PlayerId, RoomCode),

    /// The player is not a member of this room.
    #[error("player {0} is not in room {1}")]
    NotInRoom(PlayerId, RoomCode),
}
