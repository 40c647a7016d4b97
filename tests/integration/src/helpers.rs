//! Test helpers for integration tests
//!
//! Provides an in-process stub backend bound to an ephemeral port, plus
//! constructors for clients pointed at it.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, RawQuery, State,
    },
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use clubhub_client::ClubApi;
use clubhub_common::ApiConfig;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::fixtures::{self, TEST_EMAIL, TEST_PASSWORD, TEST_TOKEN};

/// Chat text that makes the stub close the sender's socket
pub const CLOSE_COMMAND: &str = "/close";

/// Recorded traffic and injected failures, shared with the handlers
#[derive(Default)]
pub struct StubState {
    /// Raw query string of the last list request
    pub last_query: Mutex<Option<String>>,
    /// Requests that reached `GET /clubs`
    pub club_list_hits: AtomicU32,
    /// Remaining `GET /clubs` requests to fail with `fail_status`
    fail_next: AtomicU32,
    fail_status: AtomicU16,
    /// Club ids joined through `POST /clubs/{id}/join`
    pub joined: Mutex<Vec<i64>>,
    /// `(room_id, username)` of every `JOIN_ROOM` frame received
    pub chat_joins: Mutex<Vec<(i64, String)>>,
    /// Every raw text frame received on the chat socket
    pub chat_frames: Mutex<Vec<String>>,
    chat_tx: Mutex<Option<broadcast::Sender<Value>>>,
}

impl StubState {
    /// Fail the next `count` club list requests with `status`
    pub fn fail_club_list(&self, count: u32, status: u16) {
        self.fail_status.store(status, Ordering::SeqCst);
        self.fail_next.store(count, Ordering::SeqCst);
    }

    fn take_failure(&self) -> Option<StatusCode> {
        let remaining = self.fail_next.load(Ordering::SeqCst);
        if remaining == 0 {
            return None;
        }
        self.fail_next.store(remaining - 1, Ordering::SeqCst);
        StatusCode::from_u16(self.fail_status.load(Ordering::SeqCst)).ok()
    }

    fn chat_sender(&self) -> broadcast::Sender<Value> {
        self.chat_tx
            .lock()
            .get_or_insert_with(|| broadcast::channel(64).0)
            .clone()
    }

    pub fn chat_join_count(&self) -> usize {
        self.chat_joins.lock().len()
    }
}

/// Stub backend instance that manages lifecycle
pub struct StubBackend {
    pub addr: SocketAddr,
    pub state: Arc<StubState>,
    _handle: JoinHandle<()>,
}

impl StubBackend {
    /// Start a stub backend on an ephemeral port
    pub async fn start() -> Result<Self> {
        let state = Arc::new(StubState::default());
        let app = router(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for the REST endpoints
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get URL of the chat socket
    pub fn chat_url(&self) -> String {
        format!("ws://{}/ws/chat", self.addr)
    }

    /// Client without a bearer token
    pub fn anonymous_api(&self) -> Result<ClubApi> {
        Ok(ClubApi::new(&self.api_config(None))?)
    }

    /// Client carrying the token the stub accepts
    pub fn api(&self) -> Result<ClubApi> {
        Ok(ClubApi::new(&self.api_config(Some(TEST_TOKEN)))?)
    }

    fn api_config(&self, token: Option<&str>) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url(),
            token: token.map(String::from),
            timeout_secs: 5,
        }
    }
}

/// Poll `cond` until it holds or two seconds pass
pub async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}

fn router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/communities", get(list_communities))
        .route("/communities/:id", get(get_community))
        .route(
            "/communities/:id/clubs",
            get(list_community_clubs).post(create_club),
        )
        .route("/clubs", get(list_clubs))
        .route("/clubs/:id", get(get_club))
        .route("/clubs/:id/join", post(join_club))
        .route("/clubs/:id/rooms", get(list_club_rooms))
        .route("/Rooms", get(list_rooms).post(create_room))
        .route("/Memberships/tree", get(membership_tree))
        .route("/api/auth/login", post(login))
        .route("/ws/chat", get(chat_socket))
        .with_state(state)
}

// ============================================================================
// REST handlers
// ============================================================================

type StubResult = Result<Json<Value>, (StatusCode, String)>;

fn authorized(headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let expected = format!("Bearer {TEST_TOKEN}");
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, "missing or bad token".to_string())),
    }
}

fn not_found(what: &str, id: i64) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{what} {id} not found"))
}

async fn list_communities(
    State(state): State<Arc<StubState>>,
    RawQuery(query): RawQuery,
) -> StubResult {
    *state.last_query.lock() = query;
    let items = (1..=3).map(fixtures::community).collect();
    Ok(Json(fixtures::paged(items, 1, 20, 3)))
}

async fn get_community(Path(id): Path<i64>) -> StubResult {
    if id > 3 {
        return Err(not_found("community", id));
    }
    Ok(Json(fixtures::community(id)))
}

async fn list_community_clubs(
    State(state): State<Arc<StubState>>,
    Path(id): Path<i64>,
    RawQuery(query): RawQuery,
) -> StubResult {
    *state.last_query.lock() = query;
    let items = vec![fixtures::club(10, id), fixtures::club(11, id)];
    Ok(Json(fixtures::paged(items, 1, 20, 2)))
}

async fn create_club(
    headers: HeaderMap,
    Path(community_id): Path<i64>,
    Json(body): Json<Value>,
) -> StubResult {
    authorized(&headers)?;
    let Some(name) = body.get("Name").and_then(Value::as_str) else {
        return Err((StatusCode::BAD_REQUEST, "Name is required".to_string()));
    };
    let mut club = fixtures::club(99, community_id);
    club["Name"] = json!(name);
    club["Description"] = body.get("Description").cloned().unwrap_or(Value::Null);
    club["IsMember"] = json!(true);
    Ok(Json(club))
}

async fn list_clubs(
    State(state): State<Arc<StubState>>,
    RawQuery(query): RawQuery,
) -> StubResult {
    state.club_list_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = state.take_failure() {
        return Err((status, "injected failure".to_string()));
    }
    *state.last_query.lock() = query;
    let items = vec![fixtures::club(10, 1), fixtures::club(20, 2)];
    Ok(Json(fixtures::paged(items, 1, 20, 2)))
}

async fn get_club(Path(id): Path<i64>) -> StubResult {
    if id >= 1000 {
        return Err(not_found("club", id));
    }
    Ok(Json(fixtures::club(id, 1)))
}

async fn join_club(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    authorized(&headers)?;
    if id >= 1000 {
        return Err(not_found("club", id));
    }
    state.joined.lock().push(id);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_club_rooms(Path(id): Path<i64>) -> StubResult {
    Ok(Json(json!([
        fixtures::room(100, id),
        fixtures::room(101, id)
    ])))
}

async fn list_rooms(
    State(state): State<Arc<StubState>>,
    RawQuery(query): RawQuery,
) -> StubResult {
    *state.last_query.lock() = query;
    let items = vec![fixtures::room(100, 10)];
    Ok(Json(fixtures::paged(items, 1, 20, 1)))
}

async fn create_room(headers: HeaderMap, Json(body): Json<Value>) -> StubResult {
    authorized(&headers)?;
    let club_id = body.get("ClubId").and_then(Value::as_i64).unwrap_or_default();
    let mut room = fixtures::room(500, club_id);
    room["Name"] = body.get("Name").cloned().unwrap_or(Value::Null);
    Ok(Json(room))
}

async fn membership_tree(headers: HeaderMap) -> StubResult {
    authorized(&headers)?;
    Ok(Json(fixtures::membership_tree()))
}

async fn login(Json(body): Json<Value>) -> StubResult {
    let email = body.get("Email").and_then(Value::as_str);
    let password = body.get("Password").and_then(Value::as_str);
    if email == Some(TEST_EMAIL) && password == Some(TEST_PASSWORD) {
        Ok(Json(json!({"token": TEST_TOKEN, "userId": 7, "username": "player"})))
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid credentials".to_string()))
    }
}

// ============================================================================
// Chat socket
// ============================================================================

enum Outbound {
    Text(String),
    Close,
}

async fn chat_socket(
    State(state): State<Arc<StubState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_chat(state, socket))
}

/// Relay chat traffic: `SEND_MESSAGE` becomes a `CHAT_MESSAGE` for every
/// socket joined to the same room. After a join the stub also sends an
/// unknown frame type and a malformed frame to the joining socket.
async fn handle_chat(state: Arc<StubState>, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();
    let broadcast_tx = state.chat_sender();
    let mut broadcast_rx = broadcast_tx.subscribe();
    let joined_room = Arc::new(Mutex::new(None::<i64>));

    let writer = tokio::spawn(async move {
        while let Some(out) = rx.recv().await {
            let result = match out {
                Outbound::Text(text) => sink.send(Message::Text(text.into())).await,
                Outbound::Close => {
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            };
            if result.is_err() {
                break;
            }
        }
    });

    let relay_tx = tx.clone();
    let relay_room = joined_room.clone();
    let relay = tokio::spawn(async move {
        while let Ok(frame) = broadcast_rx.recv().await {
            let room = frame.get("roomId").and_then(Value::as_i64);
            if room.is_some() && room == *relay_room.lock() {
                if relay_tx.send(Outbound::Text(frame.to_string())).is_err() {
                    break;
                }
            }
        }
    });

    while let Some(Ok(msg)) = stream.next().await {
        let text = match msg {
            Message::Text(text) => text.to_string(),
            Message::Close(_) => break,
            _ => continue,
        };
        state.chat_frames.lock().push(text.clone());

        let Ok(frame) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        match frame.get("type").and_then(Value::as_str) {
            Some("JOIN_ROOM") => {
                let room_id = frame.get("roomId").and_then(Value::as_i64).unwrap_or_default();
                let username = frame
                    .get("username")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                *joined_room.lock() = Some(room_id);
                state.chat_joins.lock().push((room_id, username.clone()));

                let notice = json!({"type": "USER_JOINED", "roomId": room_id, "username": username});
                let _ = tx.send(Outbound::Text(notice.to_string()));
                let _ = tx.send(Outbound::Text("{not json".to_string()));
            }
            Some("SEND_MESSAGE") => {
                if frame.get("message").and_then(Value::as_str) == Some(CLOSE_COMMAND) {
                    let _ = tx.send(Outbound::Close);
                    break;
                }
                let mut relayed = frame.clone();
                relayed["type"] = json!("CHAT_MESSAGE");
                let _ = broadcast_tx.send(relayed);
            }
            _ => {}
        }
    }

    relay.abort();
    drop(tx);
    let _ = writer.await;
}
