//! Club directory trait (port) - the data source browsing code depends on
//!
//! The domain layer defines what it needs, and the client layer provides the
//! REST-backed implementation.

use async_trait::async_trait;

use crate::entities::{Club, Community, MembershipTree, PageQuery, Paged, Room};

/// Read-mostly view over communities, clubs, and rooms
#[async_trait]
pub trait ClubDirectory: Send + Sync {
    /// Error produced by the backing data source
    type Error: std::error::Error + Send + Sync + 'static;

    /// List communities
    async fn communities(&self, query: &PageQuery) -> Result<Paged<Community>, Self::Error>;

    /// List the clubs of a community
    async fn community_clubs(
        &self,
        community_id: i64,
        query: &PageQuery,
    ) -> Result<Paged<Club>, Self::Error>;

    /// List the rooms of a club
    async fn club_rooms(&self, club_id: i64) -> Result<Vec<Room>, Self::Error>;

    /// Join a club
    async fn join_club(&self, club_id: i64) -> Result<(), Self::Error>;

    /// Communities, clubs, and rooms the caller belongs to
    async fn membership_tree(&self) -> Result<MembershipTree, Self::Error>;
}
