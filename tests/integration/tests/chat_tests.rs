//! Chat session integration tests over a real WebSocket
//!
//! Run with: cargo test -p integration-tests --test chat_tests

use std::sync::Arc;
use std::time::Duration;

use clubhub_client::{ChatSession, ChatSessionConfig, MessageCallback};
use clubhub_common::ClientError;
use clubhub_core::ChatMessage;
use integration_tests::{eventually, fixtures::ROOM_ID, StubBackend, CLOSE_COMMAND};
use parking_lot::Mutex;

async fn backend() -> StubBackend {
    StubBackend::start().await.expect("Failed to start stub backend")
}

fn recording_callback() -> (MessageCallback, Arc<Mutex<Vec<ChatMessage>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let callback: MessageCallback = Arc::new(move |msg: &ChatMessage| sink.lock().push(msg.clone()));
    (callback, seen)
}

async fn open(server: &StubBackend, room_id: i64, username: &str) -> ChatSession {
    open_with(server, room_id, username, None).await
}

async fn open_with(
    server: &StubBackend,
    room_id: i64,
    username: &str,
    callback: Option<MessageCallback>,
) -> ChatSession {
    let session = ChatSession::connect(
        ChatSessionConfig::new(server.chat_url(), room_id, username),
        callback,
    );
    let connected = tokio::time::timeout(Duration::from_secs(5), session.wait_connected())
        .await
        .expect("timed out opening chat");
    assert!(connected, "chat session did not connect");
    session
}

#[tokio::test]
async fn test_join_sent_once_on_open() {
    let server = backend().await;
    let state = server.state.clone();

    let session = open(&server, ROOM_ID, "alice").await;
    assert!(session.is_connected());

    assert!(eventually(|| state.chat_join_count() == 1).await);
    assert_eq!(state.chat_joins.lock()[0], (ROOM_ID, "alice".to_string()));

    // Give a duplicate join time to show up
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(state.chat_join_count(), 1);
}

#[tokio::test]
async fn test_send_message_round_trip() {
    let server = backend().await;
    let (callback, seen) = recording_callback();

    let session = open_with(&server, ROOM_ID, "alice", Some(callback)).await;
    assert!(eventually(|| server.state.chat_join_count() == 1).await);

    session.send_message("hello", 7).unwrap();
    assert!(eventually(|| session.message_count() == 1).await);

    let messages = session.messages();
    assert_eq!(messages[0].message, "hello");
    assert_eq!(messages[0].user_id, 7);
    assert_eq!(messages[0].username, "alice");
    assert_eq!(messages[0].room_id, ROOM_ID);
    assert!(messages[0].sent_at().is_some());
    assert_eq!(*seen.lock(), messages);
}

#[tokio::test]
async fn test_unknown_and_malformed_frames_ignored() {
    let server = backend().await;

    // The stub answers every join with an unknown frame and a malformed one
    let session = open(&server, ROOM_ID, "alice").await;
    assert!(eventually(|| server.state.chat_join_count() == 1).await);
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(session.is_connected());
    assert_eq!(session.message_count(), 0);
}

#[tokio::test]
async fn test_messages_kept_in_arrival_order() {
    let server = backend().await;
    let session = open(&server, ROOM_ID, "alice").await;
    assert!(eventually(|| server.state.chat_join_count() == 1).await);

    for text in ["one", "two", "three"] {
        session.send_message(text, 1).unwrap();
    }
    assert!(eventually(|| session.message_count() == 3).await);

    let texts: Vec<String> = session.messages().into_iter().map(|m| m.message).collect();
    assert_eq!(texts, ["one", "two", "three"]);
}

#[tokio::test]
async fn test_messages_reach_other_room_members_only() {
    let server = backend().await;
    let alice = open(&server, ROOM_ID, "alice").await;
    let bob = open(&server, ROOM_ID, "bob").await;
    let carol = open(&server, ROOM_ID + 1, "carol").await;
    assert!(eventually(|| server.state.chat_join_count() == 3).await);

    alice.send_message("hi bob", 1).unwrap();

    assert!(eventually(|| bob.message_count() == 1).await);
    assert_eq!(bob.messages()[0].username, "alice");
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(carol.message_count(), 0);
}

#[tokio::test]
async fn test_server_close_disconnects() {
    let server = backend().await;
    let session = open(&server, ROOM_ID, "alice").await;
    assert!(eventually(|| server.state.chat_join_count() == 1).await);

    session.send_message(CLOSE_COMMAND, 1).unwrap();
    tokio::time::timeout(Duration::from_secs(5), session.wait_closed())
        .await
        .expect("session did not observe close");

    assert!(!session.is_connected());
    assert!(matches!(
        session.send_message("after close", 1),
        Err(ClientError::NotConnected)
    ));
}

#[tokio::test]
async fn test_connect_failure_leaves_session_disconnected() {
    let session = ChatSession::connect(
        ChatSessionConfig::new("ws://127.0.0.1:9/ws/chat", ROOM_ID, "alice"),
        None,
    );

    let connected = tokio::time::timeout(Duration::from_secs(5), session.wait_connected())
        .await
        .expect("connect attempt hung");
    assert!(!connected);
    assert!(!session.is_connected());
    assert!(matches!(
        session.send_message("nobody home", 1),
        Err(ClientError::NotConnected)
    ));
}

#[tokio::test]
async fn test_close_then_reconnect_keeps_history() {
    let server = backend().await;
    let mut session = open(&server, ROOM_ID, "alice").await;
    assert!(eventually(|| server.state.chat_join_count() == 1).await);

    session.send_message("before", 1).unwrap();
    assert!(eventually(|| session.message_count() == 1).await);

    session.close().await;
    assert!(!session.is_connected());

    session.reconnect().await;
    assert!(session.wait_connected().await);
    assert!(eventually(|| server.state.chat_join_count() == 2).await);

    session.send_message("after", 1).unwrap();
    assert!(eventually(|| session.message_count() == 2).await);
    let texts: Vec<String> = session.messages().into_iter().map(|m| m.message).collect();
    assert_eq!(texts, ["before", "after"]);
}
