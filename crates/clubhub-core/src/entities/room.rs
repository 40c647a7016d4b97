//! Room entity - a chat room inside a club

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::limits::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use crate::error::DomainError;

/// Room as returned by `/Rooms` and `/clubs/{id}/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Room {
    pub id: i64,
    pub club_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<String>,
}

impl Room {
    /// Create a room with only the required fields
    pub fn new(id: i64, name: String) -> Self {
        Self {
            id,
            club_id: None,
            name,
            description: None,
            created_at: None,
        }
    }
}

/// Payload for creating a room through `/Rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRoomRequest {
    pub club_id: i64,
    #[validate(length(min = 1, max = MAX_NAME_LEN, message = "room name length is out of range"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_DESCRIPTION_LEN))]
    pub description: Option<String>,
}

impl CreateRoomRequest {
    /// Build a request, trimming surrounding whitespace from the inputs
    pub fn new(club_id: i64, name: &str, description: Option<&str>) -> Self {
        Self {
            club_id,
            name: name.trim().to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
        }
    }

    /// Reject the request before any network I/O happens
    pub fn ensure_valid(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))
    }
}
