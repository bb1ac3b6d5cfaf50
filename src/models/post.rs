//! Post model and the bodies exchanged when creating one

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{User, null_as_default};
use crate::time;

/// Longest title derived from post content
pub const TITLE_MAX_CHARS: usize = 80;

/// A post as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Server-assigned ID
    pub id: i64,
    /// Title (derived from content when the composer supplies none)
    #[serde(default)]
    pub title: Option<String>,
    /// Post body
    pub content: String,
    /// Author's user ID
    pub user_id: i64,
    /// When the post was created
    pub created_at: DateTime<Utc>,
    /// Author snapshot, when the server embeds it
    #[serde(default)]
    pub user: Option<User>,
    /// Number of likes
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u32,
}

impl Post {
    /// Author name, or a placeholder when the server did not embed the user
    pub fn author_name(&self) -> &str {
        self.user.as_ref().map_or("Unknown", |u| u.name.as_str())
    }

    /// Get a short preview of the content (for list display)
    pub fn preview(&self, max_chars: usize) -> String {
        let content = self.content.replace('\n', " ");
        if content.chars().count() <= max_chars {
            content
        } else {
            let cut: String = content.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{cut}...")
        }
    }

    /// Get relative time string (e.g., "just now", "5m ago", "3d ago")
    pub fn relative_time(&self) -> String {
        time::relative_label(self.created_at)
    }
}

/// Body of a create-post request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    /// Title derived from the content
    pub title: String,
    /// Trimmed content
    pub content: String,
    /// Author (the session user)
    pub user_id: i64,
}

impl NewPost {
    /// Build a request from raw composer input.
    ///
    /// Returns `None` when the content is blank after trimming.
    pub fn from_content(content: &str, user_id: i64) -> Option<Self> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            title: derive_title(content),
            content: content.to_string(),
            user_id,
        })
    }
}

/// First [`TITLE_MAX_CHARS`] characters of the trimmed content
pub fn derive_title(content: &str) -> String {
    content.trim().chars().take(TITLE_MAX_CHARS).collect()
}

/// What the server handed back after a create-post request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatedPost {
    /// The canonical record of the new post
    Created(Post),
    /// A bare confirmation; the feed has to be fetched again
    Acknowledged,
}

impl CreatedPost {
    /// Interpret a create-post response body.
    ///
    /// Accepts the post itself or the post wrapped under `post`/`data`.
    pub fn from_value(value: serde_json::Value) -> Self {
        let candidate = match value {
            serde_json::Value::Object(mut map) => {
                if let Some(inner) = map.remove("post").or_else(|| map.remove("data")) {
                    inner
                } else {
                    serde_json::Value::Object(map)
                }
            }
            other => other,
        };

        serde_json::from_value::<Post>(candidate).map_or(Self::Acknowledged, Self::Created)
    }
}
