//! Wire protocol for Pairplay.
//!
//! This crate defines the "language" that clients and the relay speak:
//!
//! - **Events** ([`ClientEvent`], [`ServerEvent`]): the socket-style
//!   `{event, data}` frames.
//! - **Payloads** ([`Action`], [`Role`], [`RoleMap`], [`RoomCode`],
//!   [`PlayerId`]): what the events carry.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events become bytes.
//! - **Addressing** ([`Recipient`]): who an outgoing event is for.
//!
//! ```text
//! Transport (bytes) → Protocol (events) → Session (room reactions)
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    Action, ClientEvent, PlayerId, RESTART, Recipient, Role, RoleMap,
    RoomCode, SWAP_SIDES, ServerEvent,
};
