//! Real-time room chat

mod session;

pub use session::{ChatSession, ChatSessionConfig, MessageCallback};
