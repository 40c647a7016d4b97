//! Membership tree - the communities, clubs, and rooms the caller belongs to

use serde::{Deserialize, Serialize};

use crate::entities::Room;
use crate::error::DomainError;

/// Response of `/Memberships/tree`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MembershipTree {
    #[serde(default)]
    pub communities: Vec<CommunityNode>,
}

/// A community node with the clubs joined inside it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommunityNode {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub clubs: Vec<ClubNode>,
}

/// A club node with its rooms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClubNode {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl MembershipTree {
    /// Total number of joined clubs
    pub fn club_count(&self) -> usize {
        self.communities.iter().map(|c| c.clubs.len()).sum()
    }

    /// Total number of reachable rooms
    pub fn room_count(&self) -> usize {
        self.clubs().map(|club| club.rooms.len()).sum()
    }

    /// Iterate every joined club across communities
    pub fn clubs(&self) -> impl Iterator<Item = &ClubNode> {
        self.communities.iter().flat_map(|c| c.clubs.iter())
    }

    /// Find a joined club by ID
    pub fn club(&self, club_id: i64) -> Result<&ClubNode, DomainError> {
        self.clubs()
            .find(|club| club.id == club_id)
            .ok_or(DomainError::ClubNotFound(club_id))
    }

    /// Locate a room, returning the club that owns it
    pub fn locate_room(&self, room_id: i64) -> Result<(&ClubNode, &Room), DomainError> {
        self.clubs()
            .find_map(|club| {
                club.rooms
                    .iter()
                    .find(|room| room.id == room_id)
                    .map(|room| (club, room))
            })
            .ok_or(DomainError::RoomNotFound(room_id))
    }
}
