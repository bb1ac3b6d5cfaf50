//! Session credential record

use serde::{Deserialize, Serialize};

/// Proof that the current user is authenticated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token for authenticated requests
    pub token: String,
    /// Logged-in user's ID
    pub user_id: String,
}

impl Session {
    /// Create a session record
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
        }
    }

    /// User ID as the integer the API uses in post bodies
    pub fn numeric_user_id(&self) -> Option<i64> {
        self.user_id.trim().parse().ok()
    }
}
