//! Relay behavior observed through real WebSocket clients.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{
    connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};

use channel_relay::config::Settings;
use channel_relay::domain::Message;

use crate::common::TestApp;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn connect(addr: SocketAddr, username: &str, password: &str) -> Client {
    let url = format!("ws://{addr}/ws?username={username}&password={password}");
    let (client, _) = connect_async(url).await.expect("handshake");
    client
}

/// Next JSON text frame, skipping control frames.
async fn next_json(client: &mut Client) -> Value {
    loop {
        let frame = timeout(WAIT, client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("transport error");
        match frame {
            WsMessage::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

/// Wait until the server ends the connection.
async fn expect_closed(client: &mut Client) {
    loop {
        match timeout(WAIT, client.next()).await.expect("connection stayed open") {
            None | Some(Err(_)) | Some(Ok(WsMessage::Close(_))) => return,
            Some(Ok(_)) => continue,
        }
    }
}

async fn send_json(client: &mut Client, value: Value) {
    client
        .send(WsMessage::text(value.to_string()))
        .await
        .unwrap();
}

/// Poll presence until the hub reports `expected` sessions.
async fn wait_for_sessions(app: &TestApp, expected: usize) {
    timeout(WAIT, async {
        loop {
            if app.state.hub.presence().await.unwrap().total_count == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("session count never settled");
}

/// Settings with a two-second idle window.
fn short_heartbeat() -> Settings {
    let mut settings = Settings::defaults().unwrap();
    settings.websocket.pong_wait_secs = 2;
    settings.websocket.ping_period_secs = 1;
    settings
}

fn leave_notices(app: &TestApp, username: &str, channel: &str) -> usize {
    let notice = format!("{username} left {channel}");
    app.state
        .store
        .recent_messages(channel, usize::MAX)
        .iter()
        .filter(|m| m.content == notice)
        .count()
}

#[tokio::test]
async fn test_bad_credentials_get_error_frame_and_close() {
    let app = TestApp::new().await;
    let addr = app.serve().await;

    let mut client = connect(addr, "alice", "nope").await;

    assert_eq!(
        next_json(&mut client).await,
        json!({ "error": "Invalid username or password" })
    );
    expect_closed(&mut client).await;
    assert_eq!(app.state.hub.presence().await.unwrap().total_count, 0);
}

#[tokio::test]
async fn test_join_notice_is_sent_to_the_joiner() {
    let app = TestApp::new().await;
    let addr = app.serve().await;

    let mut alice = connect(addr, "alice", "password123").await;

    let join = next_json(&mut alice).await;
    assert_eq!(join["user"], "System");
    assert_eq!(join["type"], "system");
    assert_eq!(join["channel"], "general");
    assert_eq!(join["content"], "alice joined general");
}

#[tokio::test]
async fn test_message_is_stamped_and_relayed() {
    let app = TestApp::new().await;
    let addr = app.serve().await;

    let mut alice = connect(addr, "alice", "password123").await;
    next_json(&mut alice).await;

    send_json(
        &mut alice,
        json!({
            "id": "forged",
            "user": "mallory",
            "channel": "tech",
            "timestamp": "2000-01-01T00:00:00Z",
            "content": "hello everyone"
        }),
    )
    .await;

    let relayed = next_json(&mut alice).await;
    assert_eq!(relayed["user"], "alice");
    assert_eq!(relayed["channel"], "general");
    assert_eq!(relayed["content"], "hello everyone");
    assert_eq!(relayed["type"], "text");
    assert_ne!(relayed["id"], "forged");
    assert_ne!(relayed["timestamp"], "2000-01-01T00:00:00Z");

    let history = app.state.store.recent_messages("general", 50);
    assert_eq!(history.last().unwrap().content, "hello everyone");
    assert_eq!(app.state.store.count("tech"), 0);
}

#[tokio::test]
async fn test_channels_are_isolated() {
    let app = TestApp::new().await;
    let addr = app.serve().await;

    let mut alice = connect(addr, "alice", "password123").await;
    next_json(&mut alice).await;
    let mut bob = connect(addr, "bob", "password123").await;
    assert_eq!(next_json(&mut bob).await["content"], "bob joined tech");

    send_json(&mut alice, json!({ "content": "general only" })).await;
    assert_eq!(next_json(&mut alice).await["content"], "general only");

    send_json(&mut bob, json!({ "content": "tech only" })).await;
    let received = next_json(&mut bob).await;
    assert_eq!(received["content"], "tech only");
    assert_eq!(received["channel"], "tech");
}

#[tokio::test]
async fn test_leave_notice_reaches_remaining_sessions() {
    let app = TestApp::new().await;
    let addr = app.serve().await;

    let mut first = connect(addr, "alice", "password123").await;
    assert_eq!(next_json(&mut first).await["content"], "alice joined general");

    let mut second = connect(addr, "alice", "password123").await;
    assert_eq!(next_json(&mut first).await["content"], "alice joined general");
    next_json(&mut second).await;

    second.close(None).await.unwrap();

    let leave = next_json(&mut first).await;
    assert_eq!(leave["user"], "System");
    assert_eq!(leave["content"], "alice left general");
    wait_for_sessions(&app, 1).await;
}

#[tokio::test]
async fn test_rest_message_reaches_websocket_clients() {
    let app = TestApp::new().await;
    let addr = app.serve().await;

    let mut charlie = connect(addr, "charlie", "password123").await;
    next_json(&mut charlie).await;

    let body = json!({ "content": "from the browser", "channel": "random" });
    app.post_json("/api/messages", &body.to_string()).await;

    let relayed = next_json(&mut charlie).await;
    assert_eq!(relayed["user"], "Web User");
    assert_eq!(relayed["content"], "from the browser");
}

#[tokio::test]
async fn test_malformed_frame_ends_session() {
    let app = TestApp::new().await;
    let addr = app.serve().await;

    let mut alice = connect(addr, "alice", "password123").await;
    next_json(&mut alice).await;

    alice.send(WsMessage::text("not json")).await.unwrap();

    expect_closed(&mut alice).await;
    wait_for_sessions(&app, 0).await;
    let history = app.state.store.recent_messages("general", 50);
    assert_eq!(history.last().unwrap().content, "alice left general");
}

#[tokio::test]
async fn test_oversized_frame_ends_session() {
    let app = TestApp::new().await;
    let addr = app.serve().await;

    let mut alice = connect(addr, "alice", "password123").await;
    next_json(&mut alice).await;

    let content = "x".repeat(2048);
    let _ = alice
        .send(WsMessage::text(json!({ "content": content }).to_string()))
        .await;

    expect_closed(&mut alice).await;
    wait_for_sessions(&app, 0).await;
    assert!(app
        .state
        .store
        .recent_messages("general", 50)
        .iter()
        .all(|m| m.content.len() < 2048));
}

#[tokio::test]
async fn test_client_that_never_answers_pings_is_dropped() {
    let app = TestApp::with_settings(short_heartbeat());
    let addr = app.serve().await;

    // Never polled, so no pong is ever sent back.
    let _alice = connect(addr, "alice", "password123").await;
    wait_for_sessions(&app, 1).await;

    wait_for_sessions(&app, 0).await;
    assert_eq!(leave_notices(&app, "alice", "general"), 1);
}

#[tokio::test]
async fn test_client_answering_pings_stays_connected() {
    let app = TestApp::with_settings(short_heartbeat());
    let addr = app.serve().await;

    let mut alice = connect(addr, "alice", "password123").await;
    next_json(&mut alice).await;

    // Reading drives the client's automatic pong replies.
    let quiet = tokio::time::sleep(Duration::from_secs(3));
    tokio::pin!(quiet);
    loop {
        tokio::select! {
            _ = &mut quiet => break,
            frame = alice.next() => match frame {
                Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                other => panic!("unexpected frame: {other:?}"),
            },
        }
    }

    assert_eq!(app.state.hub.presence().await.unwrap().total_count, 1);
    assert_eq!(leave_notices(&app, "alice", "general"), 0);
}

#[tokio::test]
async fn test_stalled_writer_ends_session() {
    let mut settings = Settings::defaults().unwrap();
    settings.websocket.write_wait_secs = 1;
    let app = TestApp::with_settings(settings);
    let addr = app.serve().await;

    // Never read, so the socket buffers fill up and writes stop completing.
    let _alice = connect(addr, "alice", "password123").await;
    wait_for_sessions(&app, 1).await;

    // Fewer messages than the outbound queue holds, so nothing is evicted;
    // the session can only end through its failed writer.
    let bulk = "x".repeat(256 * 1024);
    for _ in 0..96 {
        app.state
            .hub
            .publish(Message::text("bob", bulk.clone(), "general"))
            .await
            .unwrap();
    }

    wait_for_sessions(&app, 0).await;
    assert_eq!(leave_notices(&app, "alice", "general"), 1);
}
