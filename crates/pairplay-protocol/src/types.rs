//! Core protocol types for Pairplay's wire format.
//!
//! Every type here travels "on the wire": it is serialized to JSON, sent
//! over a WebSocket, and deserialized by the browser client. The JSON
//! shapes are the contract with the client, so the tests at the bottom
//! pin them down exactly.

use std::collections::BTreeMap;
use std::fmt;

use pairplay_transport::ConnectionId;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifies one participant. There is exactly one per connection.
///
/// `#[serde(transparent)]` makes `PlayerId(42)` serialize as `42`, and as
/// the string key `"42"` when used as a JSON object key (role maps).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Each connection is one participant, so the transport's id is reused.
impl From<ConnectionId> for PlayerId {
    fn from(id: ConnectionId) -> Self {
        PlayerId(id.into_inner())
    }
}

/// A short, human-typeable room code such as `"AB3K"`.
///
/// Codes are case-insensitive and whitespace-trimmed: every way of
/// building a `RoomCode` (including deserialization, via
/// `#[serde(from = "String")]`) normalizes to the trimmed, uppercase
/// form, so two codes compare equal exactly when they name the same room.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Normalizes `raw` (trim, then uppercase) into a room code.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    /// Returns the normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RoomCode {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for RoomCode {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// One of the two symmetric sides of a room.
///
/// The creator starts as `White`, the joiner as `Black`; a swap exchanges
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    White,
    Black,
}

impl Role {
    /// Returns the other side.
    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => f.write_str("white"),
            Self::Black => f.write_str("black"),
        }
    }
}

/// The role of every member of a room, keyed by player.
///
/// A `BTreeMap` keeps the JSON output ordered, which makes messages
/// stable and easy to compare in tests and logs.
pub type RoleMap = BTreeMap<PlayerId, Role>;

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who should receive a server event.
///
/// Mirrors the two addressing primitives of the transport: send to one
/// connection, or multicast to everyone subscribed to a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// One specific connection.
    Player(PlayerId),

    /// Every current member of the room, including the one whose event
    /// caused this message.
    Room(RoomCode),
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// `type` tag of the one action the server intercepts.
pub const SWAP_SIDES: &str = "swap-sides";

/// `type` tag of the synthetic action broadcast after a swap.
pub const RESTART: &str = "restart";

/// A client-defined game action.
///
/// The server does not know the game's schema. It only looks at the
/// `"type"` field of object payloads to spot the reserved
/// [`SWAP_SIDES`] request; everything else is carried as-is in
/// [`Action::Relay`] and forwarded verbatim.
///
/// On the wire an action is just its JSON value:
/// `{"type": "swap-sides"}` or e.g. `{"type": "move", "from": "e2", "to": "e4"}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Request to exchange the two members' roles.
    SwapSides,

    /// Any other payload, opaque to the server.
    Relay(Value),
}

impl Action {
    /// The synthetic `{"type": "restart"}` action that tells both clients
    /// to discard their state and start over.
    pub fn restart() -> Self {
        let mut payload = serde_json::Map::new();
        payload.insert("type".to_string(), Value::String(RESTART.to_string()));
        Self::Relay(Value::Object(payload))
    }
}

impl From<Value> for Action {
    fn from(value: Value) -> Self {
        if value.get("type").and_then(Value::as_str) == Some(SWAP_SIDES) {
            Self::SwapSides
        } else {
            Self::Relay(value)
        }
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::SwapSides => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type", SWAP_SIDES)?;
                map.end()
            }
            Self::Relay(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Action::from)
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events a client sends to the server.
///
/// `#[serde(tag = "event", content = "data")]` produces the socket-style
/// frames browser clients expect:
///   `{ "event": "join-room", "data": "AB3K" }`
/// Unit variants omit `data`: `{ "event": "create-room" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Open a new room and become its host.
    CreateRoom,

    /// Join the room with this code as the second player.
    JoinRoom(RoomCode),

    /// Relay a game action to the room (or swap sides).
    #[serde(rename_all = "camelCase")]
    Action { room_code: RoomCode, action: Action },

    /// Leave the room without closing the connection.
    LeaveRoom(RoomCode),
}

/// Events the server sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Sent once, right after the connection opens, so the client knows
    /// which key is its own in role maps.
    #[serde(rename_all = "camelCase")]
    Connected { player_id: PlayerId },

    /// To the creator: the room exists and this is your role.
    #[serde(rename_all = "camelCase")]
    RoomCreated { room_code: RoomCode, role: Role },

    /// To the joiner: you're in, and this is your role.
    #[serde(rename_all = "camelCase")]
    RoomJoined { room_code: RoomCode, role: Role },

    /// To one client: a human-readable reason its request failed.
    RoomError(String),

    /// To the host: a second player joined.
    #[serde(rename_all = "camelCase")]
    OpponentJoined { room_code: RoomCode },

    /// To the whole room: both seats are filled.
    #[serde(rename_all = "camelCase")]
    RoomReady { room_code: RoomCode, roles: RoleMap },

    /// To the whole room: a relayed action, without any wrapper.
    Action(Action),

    /// To the whole room: roles changed after a swap.
    #[serde(rename_all = "camelCase")]
    RolesUpdated { room_code: RoomCode, roles: RoleMap },

    /// To the remaining member: the other player is gone.
    #[serde(rename_all = "camelCase")]
    OpponentLeft { room_code: RoomCode },

    /// To a member that asked to leave: you are out of the room.
    #[serde(rename_all = "camelCase")]
    RoomLeft { room_code: RoomCode },
}

// =========================================================================
// Tests
// =========================================================================
