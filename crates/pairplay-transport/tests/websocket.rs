//! Integration tests for the WebSocket transport.
//!
//! These tests spin up a real WebSocket server and client to verify
//! that data actually flows over the network, and that the origin
//! policy is enforced during the handshake.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use std::time::Duration;

    use pairplay_transport::{
        Connection, Handshake, OriginPolicy, Transport, TransportError,
        WebSocketConnection, WebSocketTransport,
    };
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds on a random port and returns the transport with its address.
    async fn bind(policy: OriginPolicy) -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind")
            .with_origin_policy(policy);
        let addr = transport.local_addr().expect("local addr").to_string();
        (transport, addr)
    }

    /// Accepts the next peer and completes its handshake.
    async fn accept_open(
        transport: &mut WebSocketTransport,
    ) -> Result<WebSocketConnection, TransportError> {
        let pending = transport.accept().await?;
        pending.complete().await
    }

    async fn connect_client(addr: &str) -> ClientWs {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        ws
    }

    #[tokio::test]
    async fn test_websocket_accept_and_send_receive() {
        let (mut transport, addr) = bind(OriginPolicy::Any).await;

        let server_handle = tokio::spawn(async move {
            accept_open(&mut transport).await.expect("should accept")
        });
        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.expect("task should complete");

        assert!(server_conn.id().into_inner() > 0);

        // --- Server sends text, client receives a text frame ---
        server_conn
            .send_text(r#"{"event":"room-error","data":"nope"}"#)
            .await
            .expect("send should succeed");

        let msg = client_ws.next().await.unwrap().unwrap();
        assert!(msg.is_text(), "server frames should be text");
        assert_eq!(
            msg.into_text().unwrap().as_str(),
            r#"{"event":"room-error","data":"nope"}"#
        );

        // --- Client sends text, server receives bytes ---
        client_ws
            .send(Message::Text(r#"{"event":"create-room"}"#.into()))
            .await
            .unwrap();

        let received = server_conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"event":"create-room"}"#);

        // --- Client sends binary ---
        client_ws
            .send(Message::Binary(b"raw".to_vec().into()))
            .await
            .unwrap();
        let received = server_conn.recv().await.unwrap().unwrap();
        assert_eq!(received, b"raw");

        server_conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_websocket_send_while_recv_pending() {
        // A reader parked in recv() must not block writes on the same
        // connection.
        let (mut transport, addr) = bind(OriginPolicy::Any).await;
        let server_handle =
            tokio::spawn(async move { accept_open(&mut transport).await.unwrap() });
        let mut client_ws = connect_client(&addr).await;
        let server_conn =
            std::sync::Arc::new(server_handle.await.unwrap());

        let reader = {
            let conn = std::sync::Arc::clone(&server_conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        tokio::time::timeout(
            std::time::Duration::from_secs(2),
            server_conn.send_text("ping"),
        )
        .await
        .expect("send must not wait for the reader")
        .unwrap();

        let msg = client_ws.next().await.unwrap().unwrap();
        assert_eq!(msg.into_text().unwrap().as_str(), "ping");

        client_ws.send(Message::Close(None)).await.unwrap();
        let result = reader.await.unwrap().expect("recv should not error");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_websocket_recv_returns_none_on_client_close() {
        let (mut transport, addr) = bind(OriginPolicy::Any).await;

        let server_handle = tokio::spawn(async move {
            accept_open(&mut transport).await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        client_ws.send(Message::Close(None)).await.unwrap();

        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on client close");
    }

    #[tokio::test]
    async fn test_websocket_allow_list_rejects_unknown_origin() {
        let (mut transport, addr) =
            bind(OriginPolicy::from_origins(["https://chess.example"])).await;

        let server_handle =
            tokio::spawn(async move { accept_open(&mut transport).await });

        let mut request = format!("ws://{addr}").into_client_request().unwrap();
        request
            .headers_mut()
            .insert("Origin", "https://evil.example".parse().unwrap());
        let client = tokio_tungstenite::connect_async(request).await;
        assert!(client.is_err(), "handshake should be refused");

        let result = server_handle.await.unwrap();
        assert!(matches!(result, Err(TransportError::OriginRejected(o)) if o == "https://evil.example"));
    }

    #[tokio::test]
    async fn test_websocket_allow_list_accepts_listed_origin() {
        let (mut transport, addr) =
            bind(OriginPolicy::from_origins(["https://chess.example"])).await;

        let server_handle =
            tokio::spawn(async move { accept_open(&mut transport).await });

        let mut request = format!("ws://{addr}").into_client_request().unwrap();
        request
            .headers_mut()
            .insert("Origin", "https://chess.example".parse().unwrap());
        let (_client, _) = tokio_tungstenite::connect_async(request)
            .await
            .expect("listed origin should connect");

        assert!(server_handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_websocket_accept_returns_before_peer_speaks() {
        let (mut transport, addr) = bind(OriginPolicy::Any).await;

        // A bare TCP peer that never sends the upgrade request.
        let _silent = tokio::net::TcpStream::connect(&addr).await.unwrap();
        let pending = tokio::time::timeout(
            Duration::from_secs(2),
            transport.accept(),
        )
        .await
        .expect("accept must not wait for the handshake")
        .unwrap();
        assert!(pending.id().into_inner() > 0);

        // The next peer can be accepted and opened meanwhile.
        let server_handle =
            tokio::spawn(async move { accept_open(&mut transport).await });
        let _client = connect_client(&addr).await;
        assert!(server_handle.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_websocket_silent_peer_handshake_times_out() {
        let (transport, addr) = bind(OriginPolicy::Any).await;
        let mut transport =
            transport.with_handshake_timeout(Duration::from_millis(50));

        let _silent = tokio::net::TcpStream::connect(&addr).await.unwrap();
        let pending = transport.accept().await.unwrap();

        let result = pending.complete().await;
        assert!(matches!(
            result,
            Err(TransportError::HandshakeTimeout(t)) if t == Duration::from_millis(50)
        ));
    }
}
