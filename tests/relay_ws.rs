//! End-to-end tests: a real server on an ephemeral port, driven over
//! WebSocket and HTTP.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use relay_gateway::config::RelayConfig;
use relay_gateway::domain::notice::RECIPIENT_OFFLINE;
use relay_gateway::server::{build_app, build_state};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };
    let app = build_app(build_state(RelayConfig::default()));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn next_text(client: &mut Client) -> String {
    loop {
        let Ok(Some(Ok(msg))) = tokio::time::timeout(Duration::from_secs(5), client.next()).await
        else {
            panic!("expected a message within 5s");
        };
        if let Message::Text(text) = msg {
            return text.as_str().to_string();
        }
    }
}

async fn assert_silent(client: &mut Client) {
    let result = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(result.is_err(), "unexpected message: {result:?}");
}

/// Connects as `nickname` and returns the client with its assigned id,
/// parsed from the welcome notice.
async fn join(addr: SocketAddr, path: &str) -> (Client, String) {
    let Ok((mut client, _)) = connect_async(format!("ws://{addr}{path}")).await else {
        panic!("ws connect to {path}");
    };
    let welcome = next_text(&mut client).await;
    let Some((_, tail)) = welcome.rsplit_once("channel id: ") else {
        panic!("welcome without id: {welcome}");
    };
    let id = tail.trim_end_matches(')').to_string();
    (client, id)
}

async fn send(client: &mut Client, payload: serde_json::Value) {
    let Ok(()) = client.send(Message::text(payload.to_string())).await else {
        panic!("ws send");
    };
}

#[tokio::test]
async fn direct_message_reaches_recipient_and_echoes_to_sender() {
    let addr = spawn_server().await;
    let (mut alice, _alice_id) = join(addr, "/ws/Alice").await;
    let (mut bob, bob_id) = join(addr, "/ws/Bob").await;

    send(
        &mut alice,
        serde_json::json!({"type": 1, "toUser": bob_id, "msg": "hi", "fromUser": "spoofed"}),
    )
    .await;

    assert_eq!(next_text(&mut alice).await, "Alice: hi");
    assert_eq!(next_text(&mut bob).await, "Alice: hi");
}

#[tokio::test]
async fn direct_message_to_unknown_id_returns_offline_notice() {
    let addr = spawn_server().await;
    let (mut alice, _) = join(addr, "/ws/Alice").await;
    let (mut bob, _) = join(addr, "/ws/Bob").await;

    send(
        &mut alice,
        serde_json::json!({"type": 1, "toUser": "nobody", "msg": "hello?"}),
    )
    .await;

    assert_eq!(next_text(&mut alice).await, RECIPIENT_OFFLINE);
    assert_silent(&mut bob).await;
}

#[tokio::test]
async fn broadcast_reaches_every_client() {
    let addr = spawn_server().await;
    let (mut alice, _) = join(addr, "/ws/Alice").await;
    let (mut bob, _) = join(addr, "/ws/Bob").await;
    let (mut carol, _) = join(addr, "/websocket/Carol/42").await;

    send(&mut alice, serde_json::json!({"type": 2, "msg": "hello all"})).await;

    for client in [&mut alice, &mut bob, &mut carol] {
        assert_eq!(next_text(client).await, "Alice: hello all");
    }
}

#[tokio::test]
async fn malformed_payload_keeps_connection_open() {
    let addr = spawn_server().await;
    let (mut alice, _) = join(addr, "/ws/Alice").await;

    let Ok(()) = alice.send(Message::text("{not json")).await else {
        panic!("ws send");
    };
    assert_silent(&mut alice).await;

    send(&mut alice, serde_json::json!({"type": 2, "msg": "still alive"})).await;
    assert_eq!(next_text(&mut alice).await, "Alice: still alive");
}

#[tokio::test]
async fn closed_client_leaves_the_registry() {
    let addr = spawn_server().await;
    let (mut alice, _) = join(addr, "/ws/Alice").await;
    let (mut bob, bob_id) = join(addr, "/ws/Bob").await;

    let Ok(()) = bob.close(None).await else {
        panic!("ws close");
    };
    drop(bob);

    // Removal happens on the server task; poll until it is observed.
    let url = format!("http://{addr}/api/v1/connections/{bob_id}");
    let mut gone = false;
    for _ in 0..50 {
        let Ok(response) = reqwest::get(&url).await else {
            panic!("http get");
        };
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(gone, "bob should be unregistered after closing");

    send(
        &mut alice,
        serde_json::json!({"type": 1, "toUser": bob_id, "msg": "you there?"}),
    )
    .await;
    assert_eq!(next_text(&mut alice).await, RECIPIENT_OFFLINE);
}

#[tokio::test]
async fn health_reports_live_connections() {
    let addr = spawn_server().await;
    let (_alice, _) = join(addr, "/ws/Alice").await;

    let Ok(response) = reqwest::get(format!("http://{addr}/health")).await else {
        panic!("http get");
    };
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let Ok(body) = response.json::<serde_json::Value>().await else {
        panic!("json body");
    };
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["connections"], 1);
}
