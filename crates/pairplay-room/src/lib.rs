//! Room registry for Pairplay.
//!
//! A room pairs up to two players under a short code. The registry is the
//! only owner of room state: it creates rooms, seats and removes players,
//! swaps sides, promotes hosts, and deletes rooms the moment they empty.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — owns every live room and the player → room index
//! - [`Room`] — read-only view of one room's members, host, and roles
//! - [`Removal`] — what a departure did to a room
//! - [`CodeSource`] / [`RandomCodes`] — where room codes come from
//! - [`RoomConfig`] — registry settings

mod code;
mod config;
mod error;
mod registry;
mod room;

pub use code::{CODE_ALPHABET, CodeSource, RandomCodes};
pub use config::{MAX_PLAYERS, RoomConfig};
pub use error::RoomError;
pub use registry::{Removal, RoomRegistry};
pub use room::Room;
