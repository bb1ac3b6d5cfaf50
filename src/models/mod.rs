//! Data models for the campus feed

mod post;
mod session;
mod user;

use serde::{Deserialize, Deserializer};

pub use post::{CreatedPost, NewPost, Post, TITLE_MAX_CHARS, derive_title};
pub use session::Session;
pub use user::{LoginRequest, LoginResponse, SignupRequest, User};

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
