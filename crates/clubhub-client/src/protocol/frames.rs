//! Chat frame format
//!
//! Every frame is decoded once at the connection boundary into [`ChatFrame`].
//! Frames with a `type` outside the known set decode to [`ChatFrame::Unknown`].

use clubhub_core::ChatMessage;
use serde::{Deserialize, Serialize};

/// Chat frame, tagged by its `type` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatFrame {
    /// Client -> server: subscribe this connection to a room
    JoinRoom(JoinRoom),
    /// Client -> server: post a message to a room
    SendMessage(OutgoingMessage),
    /// Server -> client: a message posted to the joined room
    ChatMessage(ChatMessage),
    /// Any other `type`
    #[serde(other)]
    Unknown,
}

/// Payload of a `JOIN_ROOM` frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoom {
    pub room_id: i64,
    pub username: String,
}

/// Payload of a `SEND_MESSAGE` frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub room_id: i64,
    pub user_id: i64,
    pub username: String,
    pub message: String,
    pub timestamp: String,
}

impl ChatFrame {
    /// Create a `JOIN_ROOM` frame
    #[must_use]
    pub fn join_room(room_id: i64, username: impl Into<String>) -> Self {
        Self::JoinRoom(JoinRoom {
            room_id,
            username: username.into(),
        })
    }

    /// Create a `SEND_MESSAGE` frame stamped with the current time
    #[must_use]
    pub fn send_message(
        room_id: i64,
        user_id: i64,
        username: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SendMessage(OutgoingMessage {
            room_id,
            user_id,
            username: username.into(),
            message: message.into(),
            timestamp: ChatMessage::now_timestamp(),
        })
    }

    /// Wire name of the frame type
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JoinRoom(_) => "JOIN_ROOM",
            Self::SendMessage(_) => "SEND_MESSAGE",
            Self::ChatMessage(_) => "CHAT_MESSAGE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Serialize to a JSON text frame
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON text frame
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl std::fmt::Display for ChatFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JoinRoom(join) => write!(f, "ChatFrame(JOIN_ROOM, room={})", join.room_id),
            Self::SendMessage(out) => write!(f, "ChatFrame(SEND_MESSAGE, room={})", out.room_id),
            Self::ChatMessage(msg) => write!(f, "ChatFrame(CHAT_MESSAGE, room={})", msg.room_id),
            Self::Unknown => write!(f, "ChatFrame(UNKNOWN)"),
        }
    }
}
