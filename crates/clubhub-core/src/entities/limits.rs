//! Length limits shared by the create payloads

/// Maximum club or room name length accepted before sending to the backend
pub const MAX_NAME_LEN: u64 = 100;

/// Maximum description length for clubs and rooms
pub const MAX_DESCRIPTION_LEN: u64 = 500;
