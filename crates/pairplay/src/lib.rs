//! # Pairplay
//!
//! Real-time relay for two-player rooms.
//!
//! A player opens a room and shares its short code; a second player joins
//! with that code. The server assigns each member one of two symmetric
//! roles, forwards every game action to both members, lets them swap
//! roles, and tells the remaining member when the other one leaves. It
//! never interprets game moves.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pairplay::prelude::*;
//!
//! # async fn start() -> Result<(), PairplayError> {
//! let config = ServerConfig::from_env()?;
//! let server = PairplayServerBuilder::from_config(&config).build().await?;
//! server.run_until(async { let _ = tokio::signal::ctrl_c().await; }).await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod hub;
mod server;

pub use config::{ConfigError, ENV_PREFIX, ServerConfig};
pub use error::PairplayError;
pub use server::{PairplayServer, PairplayServerBuilder};

/// Re-exports for convenient glob imports.
pub mod prelude {
    pub use crate::{
        ConfigError, PairplayError, PairplayServer, PairplayServerBuilder,
        ServerConfig,
    };
    pub use pairplay_protocol::{
        Action, ClientEvent, PlayerId, Role, RoleMap, RoomCode, ServerEvent,
    };
    pub use pairplay_room::{CodeSource, RoomConfig, RoomError};
    pub use pairplay_transport::OriginPolicy;
}
