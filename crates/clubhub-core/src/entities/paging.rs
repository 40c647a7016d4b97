//! Paged list envelope and page query parameters
//!
//! The backend wraps list responses in a PascalCase envelope. Pages are passed
//! through as-is; nothing here walks or caches pages.

use serde::{Deserialize, Serialize};

/// Paged list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paged<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub has_previous: bool,
    #[serde(default)]
    pub has_next: bool,
    pub sort: Option<String>,
    pub desc: Option<bool>,
}

impl<T> Paged<T> {
    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if this page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the envelope, keeping only the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Query string parameters for list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<bool>,
}

impl PageQuery {
    /// Request a specific page and page size
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            ..Self::default()
        }
    }

    /// Sort by a field
    #[must_use]
    pub fn sorted_by(mut self, field: impl Into<String>, desc: bool) -> Self {
        self.sort = Some(field.into());
        self.desc = Some(desc);
        self
    }
}
