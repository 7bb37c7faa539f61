//! Transport Manager against an in-process websocket server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};
use url::Url;

use tableau_player::infrastructure::messaging::ConnectionStateObserver;
use tableau_player::infrastructure::websocket::TransportConfig;
use tableau_player::{ConnectionState, TransportManager};
use tableau_shared::{decode_client, encode_server, ClientMessage, PlayerNumber, ServerMessage};

const WAIT: Duration = Duration::from_secs(5);

struct Server {
    listener: TcpListener,
    origin: Url,
}

impl Server {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let port = listener.local_addr().expect("local addr").port();
        let origin = Url::parse(&format!("http://127.0.0.1:{port}")).expect("origin");
        Self { listener, origin }
    }

    async fn accept(&self) -> WebSocketStream<TcpStream> {
        let (stream, _) = timeout(WAIT, self.listener.accept())
            .await
            .expect("client should connect")
            .expect("accept");
        accept_async(stream).await.expect("websocket handshake")
    }

    async fn expect_no_connection(&self, within: Duration) {
        assert!(
            timeout(within, self.listener.accept()).await.is_err(),
            "transport reconnected unexpectedly"
        );
    }

    fn transport(&self) -> TransportManager {
        self.transport_with_backoff(Duration::from_millis(50))
    }

    fn transport_with_backoff(&self, initial_backoff: Duration) -> TransportManager {
        self.transport_with(initial_backoff, Duration::from_secs(30))
    }

    fn transport_with(
        &self,
        initial_backoff: Duration,
        heartbeat_interval: Duration,
    ) -> TransportManager {
        TransportManager::new(
            self.origin.clone(),
            TransportConfig {
                initial_backoff,
                max_backoff: initial_backoff * 4,
                heartbeat_interval,
            },
        )
    }
}

async fn wait_for_state(observer: &mut ConnectionStateObserver, target: ConnectionState) {
    timeout(WAIT, async {
        while observer.state() != target {
            if observer.changed().await.is_none() {
                break;
            }
        }
    })
    .await
    .expect("state change in time");
    assert_eq!(observer.state(), target);
}

async fn push(ws: &mut WebSocketStream<TcpStream>, message: &ServerMessage) {
    let frame = encode_server(message).expect("encode");
    ws.send(Message::Text(frame)).await.expect("server send");
}

async fn next_client_message(ws: &mut WebSocketStream<TcpStream>) -> ClientMessage {
    loop {
        let frame = timeout(WAIT, ws.next())
            .await
            .expect("frame in time")
            .expect("stream open")
            .expect("valid frame");
        if let Message::Text(text) = frame {
            return decode_client(&text).expect("client frame decodes");
        }
    }
}

#[tokio::test]
async fn delivers_frames_in_order_and_skips_malformed_ones() {
    let server = Server::start().await;
    let transport = server.transport();
    let mut observer = transport.observe();
    let mut inbound = transport.subscribe();

    transport.connect("/ws");
    assert_eq!(transport.state(), ConnectionState::Connecting);
    let mut ws = server.accept().await;
    wait_for_state(&mut observer, ConnectionState::Connected).await;

    push(&mut ws, &ServerMessage::YourTurn).await;
    ws.send(Message::Text("{not json".into()))
        .await
        .expect("server send");
    ws.send(Message::Text(r#"{"type":"teleport"}"#.into()))
        .await
        .expect("server send");
    push(
        &mut ws,
        &ServerMessage::PlayerPassed {
            by_player: PlayerNumber::Two,
        },
    )
    .await;

    let first = timeout(WAIT, inbound.recv()).await.expect("in time");
    let second = timeout(WAIT, inbound.recv()).await.expect("in time");
    assert_eq!(first, Some(ServerMessage::YourTurn));
    assert_eq!(
        second,
        Some(ServerMessage::PlayerPassed {
            by_player: PlayerNumber::Two
        })
    );
    assert_eq!(transport.state(), ConnectionState::Connected);

    transport.disconnect();
}

#[tokio::test]
async fn sends_only_while_connected() {
    let server = Server::start().await;
    let transport = server.transport();
    let mut observer = transport.observe();

    transport.connect("/ws");
    transport.send(ClientMessage::Pass);
    let mut ws = server.accept().await;
    wait_for_state(&mut observer, ConnectionState::Connected).await;

    transport.send(ClientMessage::Peek { slot_index: 3 });
    assert_eq!(
        next_client_message(&mut ws).await,
        ClientMessage::Peek { slot_index: 3 },
        "the send issued while connecting was dropped"
    );

    transport.disconnect();
}

#[tokio::test]
async fn heartbeat_probes_while_connected() {
    let server = Server::start().await;
    let transport =
        server.transport_with(Duration::from_millis(50), Duration::from_millis(100));
    let mut observer = transport.observe();

    transport.connect("/ws");
    let mut ws = server.accept().await;
    wait_for_state(&mut observer, ConnectionState::Connected).await;

    assert_eq!(next_client_message(&mut ws).await, ClientMessage::heartbeat());
    assert_eq!(next_client_message(&mut ws).await, ClientMessage::heartbeat());

    transport.disconnect();
}

#[tokio::test]
async fn reconnects_after_unexpected_close() {
    let server = Server::start().await;
    let transport = server.transport();
    let mut observer = transport.observe();

    transport.connect("/ws");
    let mut ws = server.accept().await;
    wait_for_state(&mut observer, ConnectionState::Connected).await;

    ws.close(None).await.expect("server close");
    drop(ws);

    let mut ws = server.accept().await;
    wait_for_state(&mut observer, ConnectionState::Connected).await;

    push(&mut ws, &ServerMessage::YourTurn).await;
    transport.disconnect();
    assert_eq!(transport.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn explicit_disconnect_never_reconnects() {
    let server = Server::start().await;
    let transport = server.transport();
    let mut observer = transport.observe();

    transport.connect("/ws");
    let mut ws = server.accept().await;
    wait_for_state(&mut observer, ConnectionState::Connected).await;

    transport.disconnect();
    transport.disconnect();
    assert_eq!(transport.state(), ConnectionState::Disconnected);

    // The server sees the close, then nothing else arrives.
    let closing = timeout(WAIT, ws.next()).await.expect("close in time");
    assert!(matches!(closing, None | Some(Ok(Message::Close(_))) | Some(Err(_))));
    server.expect_no_connection(Duration::from_millis(500)).await;
    assert_eq!(transport.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn disconnect_during_backoff_cancels_the_reconnect() {
    let server = Server::start().await;
    let transport = server.transport_with_backoff(Duration::from_millis(300));
    let mut observer = transport.observe();

    transport.connect("/ws");
    let mut ws = server.accept().await;
    wait_for_state(&mut observer, ConnectionState::Connected).await;

    ws.close(None).await.expect("server close");
    drop(ws);
    wait_for_state(&mut observer, ConnectionState::Disconnected).await;
    transport.disconnect();

    server.expect_no_connection(Duration::from_millis(500)).await;
    assert_eq!(transport.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn connect_replaces_the_previous_connection() {
    let server = Server::start().await;
    let transport = server.transport();
    let mut observer = transport.observe();

    transport.connect("/ws");
    let mut first = server.accept().await;
    wait_for_state(&mut observer, ConnectionState::Connected).await;

    transport.connect("/ws");
    let _second = server.accept().await;
    wait_for_state(&mut observer, ConnectionState::Connected).await;

    let closing = timeout(WAIT, first.next()).await.expect("old socket closed");
    assert!(matches!(closing, None | Some(Ok(Message::Close(_))) | Some(Err(_))));

    transport.disconnect();
}
