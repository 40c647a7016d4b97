//! Club entity - a club inside a community, owning chat rooms

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::limits::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
use crate::error::DomainError;

/// Club as returned by `/clubs` and `/communities/{id}/clubs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Club {
    pub id: i64,
    pub community_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub member_count: Option<i64>,
    pub is_member: Option<bool>,
    pub created_at: Option<String>,
}

impl Club {
    /// Create a club with only the required fields
    pub fn new(id: i64, name: String) -> Self {
        Self {
            id,
            community_id: None,
            name,
            description: None,
            member_count: None,
            is_member: None,
            created_at: None,
        }
    }

    /// Whether the backend reports the caller as a member
    #[inline]
    pub fn is_joined(&self) -> bool {
        self.is_member.unwrap_or(false)
    }

    /// Check whether the club belongs to a community
    #[inline]
    pub fn belongs_to(&self, community_id: i64) -> bool {
        self.community_id == Some(community_id)
    }
}

/// Payload for creating a club inside a community
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CreateClubRequest {
    #[validate(length(min = 1, max = MAX_NAME_LEN, message = "club name length is out of range"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_DESCRIPTION_LEN))]
    pub description: Option<String>,
}

impl CreateClubRequest {
    /// Build a request, trimming surrounding whitespace from the inputs
    pub fn new(name: &str, description: Option<&str>) -> Self {
        Self {
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
