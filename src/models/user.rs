//! User model and the auth request/response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A user as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server-assigned ID
    pub id: i64,
    /// Display name (the username chosen at signup)
    pub name: String,
    /// Email address
    pub email: String,
    /// When the account was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a login request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    /// Full institutional email
    pub email: String,
    /// Password as typed
    pub password: String,
}

/// Successful login response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token
    pub token: String,
    /// Logged-in user's ID (number or string on the wire)
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
}

/// Body of a signup request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    /// Username
    pub name: String,
    /// Email as typed
    pub email: String,
    /// Password
    pub password: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
