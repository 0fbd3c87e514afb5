//! Session handling for Pairplay.
//!
//! This crate turns client events into registry operations and the server
//! events they cause:
//!
//! 1. **Reactions** — [`SessionHandler`] handles create, join, action,
//!    leave, and disconnect
//! 2. **Addressing** — reactions name a [`Recipient`](pairplay_protocol::Recipient);
//!    [`SessionHandler::route`] expands room broadcasts into [`Delivery`]s
//! 3. **State** — [`SessionState`] says where a connection stands
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)         ← sends deliveries over connections
//!     ↕
//! Session (this crate)   ← decides who gets what
//!     ↕
//! Room registry (below)  ← owns room state
//! ```

mod handler;
mod session;

pub use handler::{Outbox, SessionHandler};
pub use session::{Delivery, SessionState};
