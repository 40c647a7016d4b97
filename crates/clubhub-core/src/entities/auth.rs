//! Login payloads for `/api/auth/login`

use serde::{Deserialize, Serialize};

/// Credentials posted to the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response carrying the bearer token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginResponse {
    #[serde(alias = "token")]
    pub token: String,
    #[serde(alias = "userId")]
    pub user_id: Option<i64>,
    #[serde(alias = "username")]
    pub username: Option<String>,
}
