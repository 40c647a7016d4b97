//! Chat message entity - one line of room chat as seen by a client

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A chat message received from (or sent to) a room.
///
/// Messages have no identity of their own; a session keeps them in arrival
/// order and never deduplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub room_id: i64,
    pub user_id: i64,
    pub username: String,
    pub message: String,
    /// ISO-8601 timestamp as produced by the sender
    pub timestamp: String,
}

impl ChatMessage {
    /// Current UTC time in the `2024-01-01T12:00:00.000Z` form
    pub fn now_timestamp() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parse the timestamp, if the sender produced a valid RFC 3339 value
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}
