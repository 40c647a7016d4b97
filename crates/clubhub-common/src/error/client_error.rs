//! Client error types
//!
//! Unified error handling for REST calls and the chat transport.

use clubhub_core::DomainError;
use std::fmt;

/// Client-wide error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // HTTP errors
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    // Chat transport errors
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Not connected")]
    NotConnected,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ClientError {
    /// HTTP status carried by this error, if the server answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get error code for log output
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Http { .. } => "HTTP_ERROR",
            Self::Request(_) => "REQUEST_FAILED",
            Self::Decode(_) => "DECODE_ERROR",
            Self::WebSocket(_) => "WEBSOCKET_ERROR",
            Self::NotConnected => "NOT_CONNECTED",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    /// Check if the server answered with a 4xx status
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Check if the server answered with a 5xx status
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Check if the server answered 429 Too Many Requests
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Create an HTTP status error
    #[must_use]
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a request error from any displayable error
    #[must_use]
    pub fn request(err: impl fmt::Display) -> Self {
        Self::Request(err.to_string())
    }

    /// Create a decode error from any displayable error
    #[must_use]
    pub fn decode(err: impl fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    /// Create a WebSocket error from any displayable error
    #[must_use]
    pub fn websocket(err: impl fmt::Display) -> Self {
        Self::WebSocket(err.to_string())
    }
}

impl From<crate::config::ConfigError> for ClientError {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
