//! # clubhub-core
//!
//! Domain layer containing the club backend's entities, the chat message type,
//! paging envelopes, request payloads, domain errors, and the directory trait.
//! This crate has zero dependencies on infrastructure (HTTP client, WebSocket, etc.).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    ChatMessage, Club, ClubNode, Community, CommunityNode, CreateClubRequest, CreateRoomRequest,
    LoginRequest, LoginResponse, MembershipTree, PageQuery, Paged, Room, MAX_DESCRIPTION_LEN,
    MAX_NAME_LEN,
};
pub use error::DomainError;
pub use traits::ClubDirectory;
