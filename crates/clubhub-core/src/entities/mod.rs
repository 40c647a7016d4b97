//! Domain entities - core business objects

mod auth;
mod chat_message;
mod club;
mod community;
mod limits;
mod membership;
mod paging;
mod room;

pub use auth::{LoginRequest, LoginResponse};
pub use chat_message::ChatMessage;
pub use club::{Club, CreateClubRequest};
pub use community::Community;
pub use limits::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};
pub use membership::{ClubNode, CommunityNode, MembershipTree};
pub use paging::{PageQuery, Paged};
pub use room::{CreateRoomRequest, Room};
