//! Community entity - a student community grouping several clubs

use serde::{Deserialize, Serialize};

/// Community as returned by `/communities`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Community {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub member_count: Option<i64>,
    pub created_at: Option<String>,
}

impl Community {
    /// Create a community with only the required fields
    pub fn new(id: i64, name: String) -> Self {
        Self {
            id,
            name,
            description: None,
            member_count: None,
            created_at: None,
        }
    }

    /// Member count, treating an absent count as zero
    pub fn members(&self) -> i64 {
        self.member_count.unwrap_or(0)
    }
}
