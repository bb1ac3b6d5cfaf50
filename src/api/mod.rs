//! API gateway for the campus feed backend

mod client;
mod endpoints;

pub use client::ApiClient;
pub use endpoints::Endpoint;

use crate::error::Result;
use crate::models::{CreatedPost, LoginRequest, LoginResponse, NewPost, Post, SignupRequest, User};

/// Backend operations the screens depend on
#[allow(async_fn_in_trait)]
pub trait FeedApi {
    /// Exchange credentials for a token and user ID
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    /// Create an account; returns the created user when the server echoes it
    async fn signup(&self, request: &SignupRequest) -> Result<Option<User>>;

    /// Fetch the full post list, most recent first
    async fn list_posts(&self) -> Result<Vec<Post>>;

    /// Create a post on behalf of the token's owner
    async fn create_post(&self, token: &str, post: &NewPost) -> Result<CreatedPost>;

    /// Fetch a single post
    async fn get_post(&self, id: i64) -> Result<Post>;

    /// Fetch a single user
    async fn get_user(&self, id: &str) -> Result<User>;
}
