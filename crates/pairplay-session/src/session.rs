//! Session types: where a connection stands, and what it should receive.

use pairplay_protocol::{PlayerId, RoomCode, ServerEvent};

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Where a connection stands relative to rooms.
///
/// ```text
///                 create-room
///   Unassigned ───────────────→ Hosting ──┐
///       │  ↑                       ↑      │
///       │  └──── leave-room ───────┼──────┤
///       │                 host left│      │
///       └──── join-room ─────→ Joined ────┤
///                                         ↓
///                     (any state) ──→ Disconnected
/// ```
///
/// The state is derived from the registry on demand rather than stored,
/// so host promotion (Joined → Hosting) needs no extra bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, not in any room.
    Unassigned,

    /// Connected and host of this room.
    Hosting(RoomCode),

    /// Connected and a non-host member of this room.
    Joined(RoomCode),

    /// Not connected (terminal).
    Disconnected,
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

/// One event for one connection, after room broadcasts were expanded
/// to the room's members.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// The connection to send to.
    pub to: PlayerId,

    /// What to send.
    pub event: ServerEvent,
}
