//! `ClubDirectory` backed by the REST API

use async_trait::async_trait;
use clubhub_common::ClientError;
use clubhub_core::{Club, ClubDirectory, Community, MembershipTree, PageQuery, Paged, Room};

use super::ClubApi;

#[async_trait]
impl ClubDirectory for ClubApi {
    type Error = ClientError;

    async fn communities(&self, query: &PageQuery) -> Result<Paged<Community>, Self::Error> {
        self.list_communities(query).await
    }

    async fn community_clubs(
        &self,
        community_id: i64,
        query: &PageQuery,
    ) -> Result<Paged<Club>, Self::Error> {
        self.list_community_clubs(community_id, query).await
    }

    async fn club_rooms(&self, club_id: i64) -> Result<Vec<Room>, Self::Error> {
        self.list_club_rooms(club_id).await
    }

    async fn join_club(&self, club_id: i64) -> Result<(), Self::Error> {
        ClubApi::join_club(self, club_id).await
    }

    async fn membership_tree(&self) -> Result<MembershipTree, Self::Error> {
        ClubApi::membership_tree(self).await
    }
}
