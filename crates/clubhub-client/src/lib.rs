//! # clubhub-client
//!
//! Client side of the club backend: typed REST calls, the real-time chat
//! session, and two independent reliability primitives (`RateLimiter` and
//! `retry_with_backoff`) that callers compose explicitly.

pub mod api;
pub mod chat;
pub mod protocol;
pub mod rate_limiter;
pub mod retry;
pub mod transport;

// Re-export commonly used types at crate root
pub use api::ClubApi;
pub use chat::{ChatSession, ChatSessionConfig, MessageCallback};
pub use protocol::{ChatFrame, JoinRoom, OutgoingMessage};
pub use rate_limiter::RateLimiter;
pub use retry::{retry_with_backoff, RetryPolicy, RetryableError};
pub use transport::{ChatTransport, Connector, WsConnector, WsTransport};
