//! Per-connection handler: upgrade, greeting, event loop, and cleanup.
//!
//! Each accepted peer gets its own Tokio task running this handler.
//! The flow is:
//!   1. Complete the WebSocket upgrade (origin check, time limit)
//!   2. Attach an outbound queue to the hub → client receives `connected`
//!   3. Spawn a writer task that drains the queue onto the socket
//!   4. Loop: receive frames → decode → dispatch through the hub
//!   5. On exit (clean close, error, or panic) → guard runs disconnect

use std::sync::Arc;

use pairplay_protocol::{ClientEvent, Codec, PlayerId, ServerEvent};
use pairplay_room::CodeSource;
use pairplay_transport::{
    Connection, Handshake, TransportError, WebSocketConnection,
    WebSocketHandshake,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::server::ServerState;
use crate::PairplayError;

/// Drop guard that runs the disconnect path when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct PeerGuard<S: CodeSource, C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<S, C>>,
}

impl<S: CodeSource, C: Codec> Drop for PeerGuard<S, C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.hub.lock().await.detach(player_id);
            tracing::info!(%player_id, "player disconnected");
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<S, C>(
    pending: WebSocketHandshake,
    state: Arc<ServerState<S, C>>,
) -> Result<(), PairplayError>
where
    S: CodeSource,
    C: Codec,
{
    tracing::debug!(conn_id = %pending.id(), "upgrading connection");
    let conn = match pending.complete().await {
        Ok(conn) => Arc::new(conn),
        // Already logged by the transport.
        Err(TransportError::OriginRejected(_)) => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    let player_id = PlayerId::from(conn.id());
    tracing::info!(conn_id = %conn.id(), %player_id, "player connected");

    let (outbound, queue) = mpsc::unbounded_channel();
    state.hub.lock().await.attach(player_id, outbound);
    let _guard = PeerGuard {
        player_id,
        state: Arc::clone(&state),
    };

    let writer = tokio::spawn(write_loop(
        Arc::clone(&conn),
        Arc::clone(&state),
        queue,
    ));

    let result = read_loop(&conn, &state, player_id).await;

    writer.abort();
    // _guard drops here → disconnect fires.
    result
}

/// Receives frames until the peer goes away.
async fn read_loop<S, C>(
    conn: &WebSocketConnection,
    state: &ServerState<S, C>,
    player_id: PlayerId,
) -> Result<(), PairplayError>
where
    S: CodeSource,
    C: Codec,
{
    loop {
        let data = match conn.recv().await? {
            Some(data) => data,
            None => {
                tracing::debug!(%player_id, "connection closed cleanly");
                return Ok(());
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode client event");
                continue;
            }
        };

        state.hub.lock().await.dispatch(player_id, event);
    }
}

/// Sends queued events as text frames until the queue closes.
async fn write_loop<S, C>(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState<S, C>>,
    mut queue: UnboundedReceiver<ServerEvent>,
) where
    S: CodeSource,
    C: Codec,
{
    while let Some(event) = queue.recv().await {
        if let Err(e) = send_event(&conn, &state.codec, &event).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "send failed, stopping writer");
            break;
        }
    }
}

/// Encodes an event and sends it, as text when the encoding is UTF-8.
async fn send_event<C: Codec>(
    conn: &WebSocketConnection,
    codec: &C,
    event: &ServerEvent,
) -> Result<(), PairplayError> {
    let bytes = codec.encode(event)?;
    match String::from_utf8(bytes) {
        Ok(text) => conn.send_text(&text).await?,
        Err(raw) => conn.send(raw.as_bytes()).await?,
    }
    Ok(())
}
