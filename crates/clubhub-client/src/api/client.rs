//! Typed wrappers around the backend's REST endpoints
//!
//! One method per endpoint. Status handling is uniform: any non-2xx answer
//! becomes [`ClientError::Http`] carrying the status and the raw body.

use clubhub_common::{ApiConfig, ClientError, ClientResult};
use clubhub_core::{
    Club, Community, CreateClubRequest, CreateRoomRequest, LoginRequest, LoginResponse,
    MembershipTree, PageQuery, Paged, Room,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// REST client bound to one backend
#[derive(Debug, Clone)]
pub struct ClubApi {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ClubApi {
    /// Build a client from the `api` config section
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::request)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Replace the bearer token, e.g. after `login`
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    // ------------------------------------------------------------------
    // Communities
    // ------------------------------------------------------------------

    pub async fn list_communities(&self, query: &PageQuery) -> ClientResult<Paged<Community>> {
        self.get("/communities", Some(query)).await
    }

    pub async fn get_community(&self, community_id: i64) -> ClientResult<Community> {
        self.get(&format!("/communities/{community_id}"), None).await
    }

    pub async fn list_community_clubs(
        &self,
        community_id: i64,
        query: &PageQuery,
    ) -> ClientResult<Paged<Club>> {
        self.get(&format!("/communities/{community_id}/clubs"), Some(query))
            .await
    }

    // ------------------------------------------------------------------
    // Clubs
    // ------------------------------------------------------------------

    pub async fn list_clubs(&self, query: &PageQuery) -> ClientResult<Paged<Club>> {
        self.get("/clubs", Some(query)).await
    }

    pub async fn get_club(&self, club_id: i64) -> ClientResult<Club> {
        self.get(&format!("/clubs/{club_id}"), None).await
    }

    /// Create a club; invalid input is rejected before any request is sent
    pub async fn create_club(
        &self,
        community_id: i64,
        request: &CreateClubRequest,
    ) -> ClientResult<Club> {
        request.ensure_valid()?;
        self.post(&format!("/communities/{community_id}/clubs"), request)
            .await
    }

    pub async fn join_club(&self, club_id: i64) -> ClientResult<()> {
        let builder = self.http.post(self.url(&format!("/clubs/{club_id}/join")));
        self.send(builder).await?;
        Ok(())
    }

    pub async fn list_club_rooms(&self, club_id: i64) -> ClientResult<Vec<Room>> {
        self.get(&format!("/clubs/{club_id}/rooms"), None).await
    }

    // ------------------------------------------------------------------
    // Rooms
    // ------------------------------------------------------------------

    pub async fn list_rooms(&self, query: &PageQuery) -> ClientResult<Paged<Room>> {
        self.get("/Rooms", Some(query)).await
    }

    /// Create a room; invalid input is rejected before any request is sent
    pub async fn create_room(&self, request: &CreateRoomRequest) -> ClientResult<Room> {
        request.ensure_valid()?;
        self.post("/Rooms", request).await
    }

    // ------------------------------------------------------------------
    // Memberships and auth
    // ------------------------------------------------------------------

    pub async fn membership_tree(&self) -> ClientResult<MembershipTree> {
        self.get("/Memberships/tree", None).await
    }

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        self.post("/api/auth/login", request).await
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&PageQuery>,
    ) -> ClientResult<T> {
        let mut builder = self.http.get(self.url(path));
        if let Some(query) = query {
            builder = builder.query(query);
        }
        let response = self.send(builder).await?;
        decode(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let builder = self.http.post(self.url(path)).json(body);
        let response = self.send(builder).await?;
        decode(response).await
    }

    #[instrument(skip_all)]
    async fn send(&self, mut builder: RequestBuilder) -> ClientResult<Response> {
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request did not complete");
            ClientError::request(e)
        })?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Backend returned an error status");
        Err(ClientError::http(status.as_u16(), body))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await.map_err(ClientError::request)?;
    serde_json::from_slice(&bytes).map_err(ClientError::decode)
}
