//! Chat wire protocol
//!
//! JSON text frames discriminated by a `type` field.

mod frames;

pub use frames::{ChatFrame, JoinRoom, OutgoingMessage};
