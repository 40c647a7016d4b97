//! Chat session
//!
//! A [`ChatSession`] owns one connection to one room at a time. The transport
//! lives inside a background task; the handle talks to it over a command
//! channel and reads shared state (connection flag, message list).
//!
//! Lifecycle: `start` spawns the task, which opens the transport. Opening is
//! the only way to become connected, and the `JOIN_ROOM` frame is sent right
//! after. A peer close, a transport error, or `close` ends the task and the
//! session is disconnected for good; only an explicit `reconnect` opens a new
//! transport.

use std::sync::Arc;

use clubhub_common::{ClientError, ClientResult};
use clubhub_core::ChatMessage;
use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::protocol::ChatFrame;
use crate::transport::{ChatTransport, Connector, WsConnector};

/// Invoked once for every chat message appended to a session
pub type MessageCallback = Arc<dyn Fn(&ChatMessage) + Send + Sync>;

/// Which room to join, as whom, and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSessionConfig {
    pub url: String,
    pub room_id: i64,
    pub username: String,
}

impl ChatSessionConfig {
    pub fn new(url: impl Into<String>, room_id: i64, username: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            room_id,
            username: username.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkState {
    /// Transport not open yet
    Opening,
    Connected,
    /// Task finished; nothing will reopen it
    Closed,
}

struct SessionState {
    link: watch::Sender<LinkState>,
    /// Append-only, arrival order
    messages: RwLock<Vec<ChatMessage>>,
}

impl SessionState {
    fn set(&self, state: LinkState) {
        self.link.send_replace(state);
    }
}

/// Channels to the running transport task
struct Link {
    commands: mpsc::UnboundedSender<ChatFrame>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Handle to a chat connection for one room
pub struct ChatSession<C: Connector = WsConnector> {
    connector: Arc<C>,
    config: ChatSessionConfig,
    on_message: Option<MessageCallback>,
    state: Arc<SessionState>,
    link: Option<Link>,
}

impl ChatSession<WsConnector> {
    /// Connect over a real WebSocket
    pub fn connect(config: ChatSessionConfig, on_message: Option<MessageCallback>) -> Self {
        Self::start(WsConnector, config, on_message)
    }
}

impl<C: Connector> ChatSession<C> {
    /// Spawn the transport task and return immediately
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        connector: C,
        config: ChatSessionConfig,
        on_message: Option<MessageCallback>,
    ) -> Self {
        let (link_tx, _) = watch::channel(LinkState::Opening);
        let mut session = Self {
            connector: Arc::new(connector),
            config,
            on_message,
            state: Arc::new(SessionState {
                link: link_tx,
                messages: RwLock::new(Vec::new()),
            }),
            link: None,
        };
        session.link = Some(session.spawn_link());
        session
    }

    fn spawn_link(&self) -> Link {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = oneshot::channel();

        self.state.set(LinkState::Opening);
        let task = tokio::spawn(run_link(
            Arc::clone(&self.connector),
            self.config.clone(),
            Arc::clone(&self.state),
            self.on_message.clone(),
            command_rx,
            shutdown_rx,
        ));

        Link {
            commands,
            shutdown,
            task,
        }
    }

    /// Whether the transport is currently open
    pub fn is_connected(&self) -> bool {
        *self.state.link.borrow() == LinkState::Connected
    }

    /// Snapshot of all messages received so far, in arrival order
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.messages.read().clone()
    }

    /// Number of messages received so far
    pub fn message_count(&self) -> usize {
        self.state.messages.read().len()
    }

    pub fn room_id(&self) -> i64 {
        self.config.room_id
    }

    pub fn username(&self) -> &str {
        &self.config.username
    }

    /// Send a chat message to the room
    ///
    /// Fails with [`ClientError::NotConnected`] without sending anything when
    /// the transport is not open. Nothing is queued for later.
    pub fn send_message(&self, text: &str, user_id: i64) -> ClientResult<()> {
        let link = match &self.link {
            Some(link) if self.is_connected() => link,
            _ => {
                warn!(room_id = self.config.room_id, "Cannot send message: not connected");
                return Err(ClientError::NotConnected);
            }
        };

        let frame = ChatFrame::send_message(
            self.config.room_id,
            user_id,
            self.config.username.as_str(),
            text,
        );
        link.commands
            .send(frame)
            .map_err(|_| ClientError::NotConnected)
    }

    /// Wait until the transport opens or the attempt ends
    ///
    /// Returns `true` if connected.
    pub async fn wait_connected(&self) -> bool {
        let mut rx = self.state.link.subscribe();
        let connected = match rx.wait_for(|state| *state != LinkState::Opening).await {
            Ok(state) => *state == LinkState::Connected,
            Err(_) => false,
        };
        connected
    }

    /// Wait until the transport task has finished
    pub async fn wait_closed(&self) {
        let mut rx = self.state.link.subscribe();
        let _ = rx.wait_for(|state| *state == LinkState::Closed).await;
    }

    /// Close the transport and wait for the task to finish
    pub async fn close(&mut self) {
        if let Some(link) = self.link.take() {
            let _ = link.shutdown.send(());
            if let Err(e) = link.task.await {
                error!(error = %e, "Chat task failed");
            }
        }
        self.state.set(LinkState::Closed);
    }

    /// Drop the current transport (if any) and open a new one
    ///
    /// Messages received so far are kept.
    pub async fn reconnect(&mut self) {
        self.close().await;
        info!(room_id = self.config.room_id, "Reconnecting to chat");
        self.link = Some(self.spawn_link());
    }
}

/// Dropping a session signals the task to close the transport and leaves it
/// to finish in the background. Use `close` to wait for that.
impl<C: Connector> Drop for ChatSession<C> {
    fn drop(&mut self) {
        if let Some(link) = self.link.take() {
            let _ = link.shutdown.send(());
        }
        self.state.set(LinkState::Closed);
    }
}

impl<C: Connector> std::fmt::Debug for ChatSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("room_id", &self.config.room_id)
            .field("username", &self.config.username)
            .field("connected", &self.is_connected())
            .field("messages", &self.message_count())
            .finish()
    }
}

// ============================================================================
// Transport task
// ============================================================================

async fn run_link<C: Connector>(
    connector: Arc<C>,
    config: ChatSessionConfig,
    state: Arc<SessionState>,
    on_message: Option<MessageCallback>,
    mut commands: mpsc::UnboundedReceiver<ChatFrame>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let room_id = config.room_id;

    let opened = tokio::select! {
        result = connector.connect(&config.url) => result,
        _ = &mut shutdown => {
            debug!(room_id, "Chat closed before the connection opened");
            state.set(LinkState::Closed);
            return;
        }
    };

    let mut transport = match opened {
        Ok(transport) => transport,
        Err(e) => {
            error!(room_id, url = %config.url, error = %e, "Chat connection failed");
            state.set(LinkState::Closed);
            return;
        }
    };

    state.set(LinkState::Connected);
    info!(room_id, username = %config.username, "Chat connected");

    let join = ChatFrame::join_room(room_id, config.username.as_str());
    if let Err(e) = send_frame(&mut transport, &join).await {
        error!(room_id, error = %e, "Failed to join room");
        state.set(LinkState::Closed);
        return;
    }

    loop {
        tokio::select! {
            command = commands.recv() => {
                if let Some(frame) = command {
                    if let Err(e) = send_frame(&mut transport, &frame).await {
                        error!(room_id, error = %e, "Chat send failed");
                        break;
                    }
                } else {
                    let _ = transport.close().await;
                    break;
                }
            }

            _ = &mut shutdown => {
                debug!(room_id, "Closing chat connection");
                if let Err(e) = transport.close().await {
                    debug!(room_id, error = %e, "Error while closing chat connection");
                }
                break;
            }

            incoming = transport.recv() => match incoming {
                Some(Ok(text)) => handle_frame(&text, &state, on_message.as_ref()),
                Some(Err(e)) => {
                    warn!(room_id, error = %e, "Chat connection error");
                    break;
                }
                None => {
                    info!(room_id, "Chat connection closed by server");
                    break;
                }
            }
        }
    }

    state.set(LinkState::Closed);
    debug!(room_id, "Chat task exited");
}

async fn send_frame<T: ChatTransport>(transport: &mut T, frame: &ChatFrame) -> ClientResult<()> {
    let text = frame.encode().map_err(ClientError::decode)?;
    debug!(%frame, "Sending chat frame");
    transport.send(text).await
}

fn handle_frame(text: &str, state: &SessionState, on_message: Option<&MessageCallback>) {
    match ChatFrame::decode(text) {
        Ok(ChatFrame::ChatMessage(message)) => {
            state.messages.write().push(message.clone());
            if let Some(callback) = on_message {
                callback(&message);
            }
        }
        Ok(other) => debug!(kind = other.kind(), "Ignoring chat frame"),
        Err(e) => warn!(error = %e, "Dropping malformed chat frame"),
    }
}
