use pairplay::prelude::*;
use tracing_subscriber::EnvFilter;

async fn build_server(config: &ServerConfig) -> Result<PairplayServer, PairplayError> {
    PairplayServerBuilder::from_config(config).build().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        addr = %config.bind_addr(),
        origins = ?config.allowed_origins,
        code_length = config.code_length,
        "starting relay server"
    );

    let server = build_server(&config).await?;
    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
        })
        .await?;

    tracing::info!("relay server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{SinkExt, StreamExt};
    use serde_json::json;
    use std::time::Duration;
    use tokio_tungstenite::tungstenite::Message;

    type Ws = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn start() -> String {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..ServerConfig::default()
        };
        let server = build_server(&config).await.unwrap();
        let addr = server.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let _ = server.run().await;
        });
        addr
    }

    async fn connect(addr: &str) -> Ws {
        let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .unwrap();
        assert!(matches!(next(&mut ws).await, ServerEvent::Connected { .. }));
        ws
    }

    async fn next(ws: &mut Ws) -> ServerEvent {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        serde_json::from_str(msg.to_text().unwrap()).unwrap()
    }

    async fn emit(ws: &mut Ws, event: serde_json::Value) {
        ws.send(Message::text(event.to_string())).await.unwrap();
    }

    #[tokio::test]
    async fn test_two_players_share_a_random_room_code() {
        let addr = start().await;
        let mut white = connect(&addr).await;
        let mut black = connect(&addr).await;

        emit(&mut white, json!({"event": "create-room"})).await;
        let room_code = match next(&mut white).await {
            ServerEvent::RoomCreated { room_code, role } => {
                assert_eq!(role, Role::White);
                room_code
            }
            other => panic!("expected room-created, got {other:?}"),
        };
        assert_eq!(room_code.as_str().len(), 4);

        let lower = room_code.as_str().to_lowercase();
        emit(&mut black, json!({"event": "join-room", "data": lower})).await;
        assert_eq!(
            next(&mut black).await,
            ServerEvent::RoomJoined {
                room_code: room_code.clone(),
                role: Role::Black,
            }
        );

        emit(
            &mut black,
            json!({"event": "action", "data": {"roomCode": room_code, "action": {"type": "move", "san": "e4"}}}),
        )
        .await;

        // white: opponent-joined, room-ready, action
        assert!(matches!(next(&mut white).await, ServerEvent::OpponentJoined { .. }));
        assert!(matches!(next(&mut white).await, ServerEvent::RoomReady { .. }));
        assert_eq!(
            next(&mut white).await,
            ServerEvent::Action(Action::Relay(json!({"type": "move", "san": "e4"})))
        );
    }
}
