//! Feed Synchronizer: the post list, pull-to-refresh and composing

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{BusyFlag, SyncOutcome};
use crate::api::FeedApi;
use crate::error::{Error, Result};
use crate::models::{CreatedPost, NewPost, Post};
use crate::session::SessionContext;

/// Result of a successful `create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The server returned the new post and it was put at the head of the feed
    Prepended(Post),
    /// The server only confirmed; the feed was fetched again
    Refetched {
        /// Whether the refetch replaced the feed
        applied: bool,
    },
}

#[derive(Debug, Default)]
struct FeedState {
    posts: Vec<Post>,
    generation: u64,
    draft: String,
}

/// In-memory feed kept in sync with the backend
pub struct FeedSynchronizer<A> {
    api: Arc<A>,
    session: SessionContext,
    state: Mutex<FeedState>,
    loading: BusyFlag,
    refreshing: BusyFlag,
    posting: BusyFlag,
}

impl<A: FeedApi> FeedSynchronizer<A> {
    /// Create an empty feed
    pub fn new(api: Arc<A>, session: SessionContext) -> Self {
        Self {
            api,
            session,
            state: Mutex::new(FeedState::default()),
            loading: BusyFlag::new("load"),
            refreshing: BusyFlag::new("refresh"),
            posting: BusyFlag::new("post"),
        }
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the feed, most recent first
    pub fn posts(&self) -> Vec<Post> {
        self.state().posts.clone()
    }

    /// Initial-load spinner
    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Pull-to-refresh indicator
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.is_set()
    }

    /// Compose button disabled
    pub fn is_posting(&self) -> bool {
        self.posting.is_set()
    }

    /// Current compose input
    pub fn draft(&self) -> String {
        self.state().draft.clone()
    }

    /// Replace the compose input
    pub fn set_draft(&self, text: impl Into<String>) {
        self.state().draft = text.into();
    }

    /// Drop the results of every request still in flight (the screen went
    /// away)
    pub fn invalidate(&self) {
        self.state().generation += 1;
    }

    /// Fetch the post list and replace the feed with it
    pub async fn load(&self) -> Result<SyncOutcome> {
        let _busy = self.loading.begin()?;
        self.fetch().await
    }

    /// Same as [`load`](Self::load), driven by the pull-to-refresh indicator
    pub async fn refresh(&self) -> Result<SyncOutcome> {
        let _busy = self.refreshing.begin()?;
        self.fetch().await
    }

    async fn fetch(&self) -> Result<SyncOutcome> {
        let ticket = {
            let mut state = self.state();
            state.generation += 1;
            state.generation
        };

        let result = self.api.list_posts().await;

        let mut state = self.state();
        match result {
            Ok(posts) if state.generation == ticket => {
                tracing::debug!(count = posts.len(), "Feed replaced");
                state.posts = posts;
                Ok(SyncOutcome::Applied)
            }
            Ok(_) => {
                tracing::debug!(ticket, current = state.generation, "Discarding stale feed response");
                Ok(SyncOutcome::Discarded)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch posts: {}", e);
                Err(e)
            }
        }
    }

    /// Publish `content` as a new post.
    ///
    /// Blank content fails validation and a missing session fails with
    /// [`Error::AuthRequired`]; neither sends a request.
    pub async fn create(&self, content: &str) -> Result<CreateOutcome> {
        if content.trim().is_empty() {
            return Err(Error::Validation("Post content cannot be empty".to_string()));
        }

        let session = self.session.current().ok_or(Error::AuthRequired)?;
        let Some(user_id) = session.numeric_user_id() else {
            tracing::warn!(user_id = %session.user_id, "Stored user id is not numeric");
            return Err(Error::AuthRequired);
        };
        let request = NewPost::from_content(content, user_id)
            .ok_or_else(|| Error::Validation("Post content cannot be empty".to_string()))?;

        let _busy = self.posting.begin()?;

        match self.api.create_post(&session.token, &request).await {
            Ok(CreatedPost::Created(post)) => {
                let mut state = self.state();
                state.posts.insert(0, post.clone());
                // an older list response must not overwrite the new head
                state.generation += 1;
                Ok(CreateOutcome::Prepended(post))
            }
            Ok(CreatedPost::Acknowledged) => {
                let applied = match self.fetch().await {
                    Ok(outcome) => outcome == SyncOutcome::Applied,
                    Err(e) => {
                        tracing::warn!("Post created but refetch failed: {}", e);
                        false
                    }
                };
                Ok(CreateOutcome::Refetched { applied })
            }
            Err(e) => {
                tracing::warn!("Failed to create post: {}", e);
                Err(e)
            }
        }
    }

    /// Publish the compose input; it is cleared only on success
    pub async fn submit_draft(&self) -> Result<CreateOutcome> {
        let draft = self.draft();
        let outcome = self.create(&draft).await?;
        self.state().draft.clear();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;
    use crate::testing::{FakeApi, Scripted, post, server_error};

    fn feed(api: &Arc<FakeApi>, logged_in: bool) -> FeedSynchronizer<FakeApi> {
        let session = SessionContext::in_memory();
        if logged_in {
            session.establish(Session::new("tok", "3"));
        }
        FeedSynchronizer::new(Arc::clone(api), session)
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_load_replaces_feed_in_received_order() {
        let api = Arc::new(FakeApi::new());
        api.push_list(Scripted::ready(Ok(vec![post(1, 1, "old"), post(3, 1, "new")])));
        let feed = feed(&api, false);

        assert_eq!(feed.load().await.unwrap(), SyncOutcome::Applied);
        assert_eq!(ids(&feed.posts()), vec![1, 3]);
        assert!(!feed.is_loading());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_feed() {
        let api = Arc::new(FakeApi::new());
        api.push_list(Scripted::ready(Ok(vec![post(2, 1, "a"), post(1, 1, "b")])));
        api.push_list(Scripted::ready(Err(server_error())));
        let feed = feed(&api, false);

        feed.load().await.unwrap();
        let result = feed.load().await;

        assert!(matches!(result, Err(Error::Http { status: 500, .. })));
        assert_eq!(ids(&feed.posts()), vec![2, 1]);
        assert!(!feed.is_loading());
    }

    #[tokio::test]
    async fn test_refresh_replaces_feed() {
        let api = Arc::new(FakeApi::new());
        api.push_list(Scripted::ready(Ok(vec![post(1, 1, "a")])));
        api.push_list(Scripted::ready(Ok(vec![post(2, 1, "b"), post(1, 1, "a")])));
        let feed = feed(&api, false);

        feed.load().await.unwrap();
        feed.refresh().await.unwrap();

        assert_eq!(ids(&feed.posts()), vec![2, 1]);
        assert!(!feed.is_refreshing());
    }

    #[tokio::test]
    async fn test_create_without_session_is_auth_required() {
        let api = Arc::new(FakeApi::new());
        api.push_list(Scripted::ready(Ok(vec![post(1, 1, "a")])));
        let feed = feed(&api, false);
        feed.load().await.unwrap();

        let result = feed.create("hello").await;

        assert!(matches!(result, Err(Error::AuthRequired)));
        assert_eq!(ids(&feed.posts()), vec![1]);
        assert_eq!(api.calls(), vec!["list_posts"]);
    }

    #[tokio::test]
    async fn test_create_blank_is_validation_error() {
        let api = Arc::new(FakeApi::new());
        let feed = feed(&api, true);

        for content in ["", "   ", "\n\t"] {
            assert!(matches!(
                feed.create(content).await,
                Err(Error::Validation(_))
            ));
        }
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_prepends_returned_post() {
        let api = Arc::new(FakeApi::new());
        api.push_list(Scripted::ready(Ok(vec![post(2, 1, "b"), post(1, 1, "a")])));
        api.push_create(Scripted::ready(Ok(CreatedPost::Created(post(10, 3, "hello")))));
        let feed = feed(&api, true);
        feed.load().await.unwrap();

        let outcome = feed.create("  hello  ").await.unwrap();

        assert!(matches!(outcome, CreateOutcome::Prepended(p) if p.id == 10));
        assert_eq!(ids(&feed.posts()), vec![10, 2, 1]);

        let created = api.created.lock().unwrap();
        let (token, request) = &created[0];
        assert_eq!(token, "tok");
        assert_eq!(request.content, "hello");
        assert_eq!(request.title, "hello");
        assert_eq!(request.user_id, 3);
    }

    #[tokio::test]
    async fn test_create_derives_long_title() {
        let api = Arc::new(FakeApi::new());
        api.push_create(Scripted::ready(Ok(CreatedPost::Created(post(1, 3, "x")))));
        let feed = feed(&api, true);

        let content = "a".repeat(120);
        feed.create(&content).await.unwrap();

        let created = api.created.lock().unwrap();
        assert_eq!(created[0].1.title, "a".repeat(80));
        assert_eq!(created[0].1.content, content);
    }

    #[tokio::test]
    async fn test_create_acknowledged_triggers_refetch() {
        let api = Arc::new(FakeApi::new());
        api.push_create(Scripted::ready(Ok(CreatedPost::Acknowledged)));
        api.push_list(Scripted::ready(Ok(vec![post(5, 3, "hello")])));
        let feed = feed(&api, true);

        let outcome = feed.create("hello").await.unwrap();

        assert_eq!(outcome, CreateOutcome::Refetched { applied: true });
        assert_eq!(ids(&feed.posts()), vec![5]);
        assert_eq!(api.calls(), vec!["create_post", "list_posts"]);
    }

    #[tokio::test]
    async fn test_draft_cleared_only_on_success() {
        let api = Arc::new(FakeApi::new());
        api.push_create(Scripted::ready(Err(server_error())));
        api.push_create(Scripted::ready(Ok(CreatedPost::Created(post(1, 3, "hi")))));
        let feed = feed(&api, true);

        feed.set_draft("hi");
        assert!(feed.submit_draft().await.is_err());
        assert_eq!(feed.draft(), "hi");
        assert!(!feed.is_posting());

        feed.submit_draft().await.unwrap();
        assert_eq!(feed.draft(), "");
    }

    #[tokio::test]
    async fn test_older_response_landing_last_is_discarded() {
        let api = Arc::new(FakeApi::new());
        let (slow, release_slow) = Scripted::gated(Ok(vec![post(1, 1, "stale")]));
        let (fast, release_fast) = Scripted::gated(Ok(vec![post(2, 1, "fresh"), post(1, 1, "stale")]));
        api.push_list(slow);
        api.push_list(fast);
        let feed = feed(&api, false);

        let driver = async {
            tokio::task::yield_now().await;
            release_fast.send(()).unwrap();
            tokio::task::yield_now().await;
            release_slow.send(()).unwrap();
        };

        let (first, second, ()) = tokio::join!(feed.load(), feed.refresh(), driver);

        assert_eq!(first.unwrap(), SyncOutcome::Discarded);
        assert_eq!(second.unwrap(), SyncOutcome::Applied);
        assert_eq!(ids(&feed.posts()), vec![2, 1]);
        assert!(!feed.is_loading());
        assert!(!feed.is_refreshing());
    }

    #[tokio::test]
    async fn test_prepend_survives_in_flight_load() {
        let api = Arc::new(FakeApi::new());
        let (slow, release) = Scripted::gated(Ok(vec![post(1, 1, "before")]));
        api.push_list(slow);
        api.push_create(Scripted::ready(Ok(CreatedPost::Created(post(9, 3, "mine")))));
        let feed = feed(&api, true);

        let create_then_release = async {
            tokio::task::yield_now().await;
            let outcome = feed.create("mine").await;
            release.send(()).unwrap();
            outcome
        };

        let (loaded, created) = tokio::join!(feed.load(), create_then_release);

        assert!(matches!(created.unwrap(), CreateOutcome::Prepended(_)));
        assert_eq!(loaded.unwrap(), SyncOutcome::Discarded);
        assert_eq!(ids(&feed.posts()), vec![9]);
    }

    #[tokio::test]
    async fn test_second_load_while_pending_is_busy() {
        let api = Arc::new(FakeApi::new());
        let (slow, release) = Scripted::gated(Ok(vec![post(1, 1, "a")]));
        api.push_list(slow);
        let feed = feed(&api, false);

        let second = async {
            tokio::task::yield_now().await;
            assert!(feed.is_loading());
            let result = feed.load().await;
            release.send(()).unwrap();
            result
        };

        let (first, second) = tokio::join!(feed.load(), second);

        assert_eq!(first.unwrap(), SyncOutcome::Applied);
        assert!(matches!(second, Err(Error::Busy("load"))));
        assert_eq!(api.calls(), vec!["list_posts"]);
    }

    #[tokio::test]
    async fn test_invalidate_discards_in_flight_response() {
        let api = Arc::new(FakeApi::new());
        let (slow, release) = Scripted::gated(Ok(vec![post(1, 1, "a")]));
        api.push_list(slow);
        let feed = feed(&api, false);

        let leave = async {
            tokio::task::yield_now().await;
            feed.invalidate();
            release.send(()).unwrap();
        };

        let (loaded, ()) = tokio::join!(feed.load(), leave);

        assert_eq!(loaded.unwrap(), SyncOutcome::Discarded);
        assert!(feed.posts().is_empty());
    }
}
