//! `PairplayServer` builder and server loop.
//!
//! This is the entry point for running a relay. It ties together all the
//! layers: transport → protocol → session → room.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pairplay_protocol::{Codec, JsonCodec};
use pairplay_room::{CodeSource, RandomCodes, RoomConfig, RoomRegistry};
use pairplay_session::SessionHandler;
use pairplay_transport::{
    DEFAULT_HANDSHAKE_TIMEOUT, OriginPolicy, Transport, TransportError,
    WebSocketHandshake, WebSocketTransport,
};
use tokio::sync::Mutex;

use crate::config::{ConfigError, ServerConfig};
use crate::handler::handle_connection;
use crate::hub::Hub;
use crate::PairplayError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The hub
/// sits behind one lock: handlers run one at a time.
pub(crate) struct ServerState<S: CodeSource, C: Codec> {
    pub(crate) hub: Mutex<Hub<S>>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Pairplay server.
///
/// # Example
///
/// ```rust,no_run
/// use pairplay::prelude::*;
///
/// # async fn start() -> Result<(), PairplayError> {
/// let server = PairplayServer::builder()
///     .bind("0.0.0.0:3001")
///     .origin_policy(OriginPolicy::from_origins(["https://play.example"]))
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PairplayServerBuilder {
    bind_addr: String,
    origin_policy: OriginPolicy,
    room_config: RoomConfig,
    handshake_timeout: Duration,
}

impl PairplayServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::from_config(&ServerConfig::default())
    }

    /// Creates a builder from loaded settings.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            bind_addr: config.bind_addr(),
            origin_policy: config.origin_policy(),
            room_config: config.room_config(),
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets which browser origins may open a connection.
    pub fn origin_policy(mut self, policy: OriginPolicy) -> Self {
        self.origin_policy = policy;
        self
    }

    /// Sets the room registry configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets how long a new peer gets to complete the WebSocket upgrade.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Binds the listener and creates an empty registry that issues
    /// random room codes.
    pub async fn build(self) -> Result<PairplayServer, PairplayError> {
        let codes = RandomCodes::new(self.room_config.code_length);
        self.build_with_code_source(codes).await
    }

    /// Like [`build`](Self::build), with room codes drawn from `codes`.
    pub async fn build_with_code_source<S: CodeSource>(
        self,
        codes: S,
    ) -> Result<PairplayServer<S>, PairplayError> {
        if self.room_config.code_length == 0 {
            return Err(ConfigError::Invalid(
                "code length must be at least 1".to_string(),
            )
            .into());
        }

        let transport = WebSocketTransport::bind(&self.bind_addr)
            .await?
            .with_origin_policy(self.origin_policy)
            .with_handshake_timeout(self.handshake_timeout);

        let registry = RoomRegistry::with_code_source(codes);
        let state = Arc::new(ServerState {
            hub: Mutex::new(Hub::new(SessionHandler::with_registry(registry))),
            codec: JsonCodec,
        });

        Ok(PairplayServer { transport, state })
    }
}

impl Default for PairplayServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A Pairplay relay server.
///
/// Call [`run()`](Self::run) or [`run_until()`](Self::run_until) to start
/// accepting connections.
pub struct PairplayServer<S: CodeSource = RandomCodes, C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<S, C>>,
}

impl PairplayServer {
    /// Creates a new builder.
    pub fn builder() -> PairplayServerBuilder {
        PairplayServerBuilder::new()
    }
}

impl<S: CodeSource, C: Codec> PairplayServer<S, C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Number of rooms currently alive.
    pub async fn room_count(&self) -> usize {
        self.state.hub.lock().await.room_count()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), PairplayError> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Runs the accept loop until `shutdown` completes.
    ///
    /// Connections already accepted keep their tasks; the registry is
    /// dropped once the last of them ends.
    pub async fn run_until<F: Future>(
        mut self,
        shutdown: F,
    ) -> Result<(), PairplayError> {
        tracing::info!(addr = ?self.transport.local_addr().ok(), "Pairplay server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested, no longer accepting");
                    return Ok(());
                }
                accepted = self.transport.accept() => self.spawn_connection(accepted),
            }
        }
    }

    /// Hands a new peer to its own task. The WebSocket upgrade runs in
    /// that task, so the loop is back to accepting right away.
    fn spawn_connection(
        &self,
        accepted: Result<WebSocketHandshake, TransportError>,
    ) {
        match accepted {
            Ok(pending) => {
                let state = Arc::clone(&self.state);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(pending, state).await {
                        tracing::debug!(error = %e, "connection ended with error");
                    }
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "accept failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_binds_ephemeral_port() {
        let server = PairplayServer::builder()
            .bind("127.0.0.1:0")
            .build()
            .await
            .unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
        assert_eq!(server.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_build_zero_code_length_is_config_error() {
        let result = PairplayServer::builder()
            .bind("127.0.0.1:0")
            .room_config(RoomConfig { code_length: 0 })
            .build()
            .await;
        assert!(matches!(
            result,
            Err(PairplayError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[tokio::test]
    async fn test_build_unparseable_address_is_transport_error() {
        let result = PairplayServer::builder().bind("not an address").build().await;
        assert!(matches!(result, Err(PairplayError::Transport(_))));
    }

    #[tokio::test]
    async fn test_run_until_returns_when_signal_fires() {
        let server = PairplayServer::builder()
            .bind("127.0.0.1:0")
            .build()
            .await
            .unwrap();
        server.run_until(async {}).await.unwrap();
    }
}
