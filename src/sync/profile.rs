//! Profile Fetcher: the logged-in user and how many posts they have

use std::sync::Arc;

use crate::api::FeedApi;
use crate::error::{Error, Result};
use crate::models::User;
use crate::session::SessionContext;

/// Data for the profile view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// The logged-in user
    pub user: User,
    /// Posts authored by the user
    pub post_count: usize,
}

/// Loads the profile of the session user
pub struct ProfileFetcher<A> {
    api: Arc<A>,
    session: SessionContext,
}

impl<A: FeedApi> ProfileFetcher<A> {
    /// Create a fetcher
    pub fn new(api: Arc<A>, session: SessionContext) -> Self {
        Self { api, session }
    }

    /// Fetch the user, then count the posts authored by the session user.
    ///
    /// A failed count is logged and reported as zero. A non-numeric session
    /// id owns no posts.
    pub async fn load(&self) -> Result<Profile> {
        let user_id = self.session.user_id().ok_or(Error::AuthRequired)?;
        let user = self.api.get_user(&user_id).await?;
        let owner = user_id.trim().parse::<i64>().ok();

        let post_count = match self.api.list_posts().await {
            Ok(posts) => posts.iter().filter(|p| Some(p.user_id) == owner).count(),
            Err(e) => {
                tracing::warn!("Failed to count posts for user {}: {}", user_id, e);
                0
            }
        };

        Ok(Profile { user, post_count })
    }
}
