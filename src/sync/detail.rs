//! Post Detail Fetcher

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{BusyFlag, SyncOutcome};
use crate::api::FeedApi;
use crate::error::{CONNECTION_MESSAGE, Error, Result};
use crate::models::Post;

/// Why a post could not be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    /// The server has no such post
    NotFound,
    /// The server could not be reached
    Network,
    /// The server answered with another error status
    Server(u16),
    /// The server answered with something that is not a post
    Invalid,
}

impl FetchFailure {
    fn from_error(err: &Error) -> Self {
        match err {
            Error::NotFound | Error::Http { status: 404, .. } => Self::NotFound,
            Error::Network(_) => Self::Network,
            Error::Http { status, .. } => Self::Server(*status),
            _ => Self::Invalid,
        }
    }

    /// Text for the detail view
    pub const fn message(&self) -> &'static str {
        match self {
            Self::NotFound => "Post not found",
            Self::Network => CONNECTION_MESSAGE,
            Self::Server(_) => "Something went wrong loading this post",
            Self::Invalid => "Unexpected response from server",
        }
    }
}

/// What the detail view shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailState {
    /// Nothing requested yet
    #[default]
    Empty,
    /// The post
    Loaded(Post),
    /// The post could not be fetched
    Unavailable(FetchFailure),
}

#[derive(Debug, Default)]
struct DetailInner {
    post_id: Option<i64>,
    view: DetailState,
    generation: u64,
}

/// Fetches one post for the detail view
pub struct PostDetailFetcher<A> {
    api: Arc<A>,
    inner: Mutex<DetailInner>,
    loading: BusyFlag,
    refreshing: BusyFlag,
}

impl<A: FeedApi> PostDetailFetcher<A> {
    /// Create a fetcher with nothing loaded
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            inner: Mutex::new(DetailInner::default()),
            loading: BusyFlag::new("load"),
            refreshing: BusyFlag::new("refresh"),
        }
    }

    fn inner(&self) -> MutexGuard<'_, DetailInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current view state
    pub fn view(&self) -> DetailState {
        self.inner().view.clone()
    }

    /// Spinner shown for the first load
    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Pull-to-refresh indicator
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.is_set()
    }

    /// Drop the result of any request in flight
    pub fn invalidate(&self) {
        self.inner().generation += 1;
    }

    /// Fetch post `id`. Fetch failures end up in [`view`](Self::view);
    /// only a busy rejection is returned as an error.
    pub async fn load(&self, id: i64) -> Result<SyncOutcome> {
        let _busy = self.loading.begin()?;
        self.fetch(id).await
    }

    /// Fetch the current post again
    pub async fn refresh(&self) -> Result<SyncOutcome> {
        let id = self
            .inner()
            .post_id
            .ok_or_else(|| Error::Validation("No post selected".to_string()))?;
        let _busy = self.refreshing.begin()?;
        self.fetch(id).await
    }

    async fn fetch(&self, id: i64) -> Result<SyncOutcome> {
        let ticket = {
            let mut inner = self.inner();
            inner.generation += 1;
            inner.post_id = Some(id);
            inner.generation
        };

        let result = self.api.get_post(id).await;

        let mut inner = self.inner();
        if inner.generation != ticket {
            tracing::debug!(post_id = id, "Discarding stale post response");
            return Ok(SyncOutcome::Discarded);
        }

        inner.view = match result {
            Ok(post) => DetailState::Loaded(post),
            Err(e) => {
                tracing::warn!(post_id = id, "Failed to fetch post: {}", e);
                DetailState::Unavailable(FetchFailure::from_error(&e))
            }
        };
        Ok(SyncOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeApi, Scripted, post, server_error};

    #[tokio::test]
    async fn test_load_success() {
        let api = Arc::new(FakeApi::new());
        api.push_get(Scripted::ready(Ok(post(4, 2, "hello"))));
        let detail = PostDetailFetcher::new(Arc::clone(&api));

        assert_eq!(detail.load(4).await.unwrap(), SyncOutcome::Applied);
        assert!(matches!(detail.view(), DetailState::Loaded(p) if p.id == 4));
        assert!(!detail.is_loading());
    }

    #[tokio::test]
    async fn test_failure_kinds_are_distinct() {
        let api = Arc::new(FakeApi::new());
        api.push_get(Scripted::ready(Err(Error::NotFound)));
        api.push_get(Scripted::ready(Err(Error::Network("down".to_string()))));
        api.push_get(Scripted::ready(Err(server_error())));
        let detail = PostDetailFetcher::new(Arc::clone(&api));

        detail.load(1).await.unwrap();
        assert_eq!(
            detail.view(),
            DetailState::Unavailable(FetchFailure::NotFound)
        );

        detail.refresh().await.unwrap();
        assert_eq!(
            detail.view(),
            DetailState::Unavailable(FetchFailure::Network)
        );

        detail.refresh().await.unwrap();
        assert_eq!(
            detail.view(),
            DetailState::Unavailable(FetchFailure::Server(500))
        );
    }

    #[tokio::test]
    async fn test_refresh_without_post_is_rejected() {
        let api = Arc::new(FakeApi::new());
        let detail = PostDetailFetcher::new(Arc::clone(&api));
        assert!(matches!(detail.refresh().await, Err(Error::Validation(_))));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_leaving_the_screen_discards_the_response() {
        let api = Arc::new(FakeApi::new());
        let (slow, release) = Scripted::gated(Ok(post(1, 1, "first")));
        api.push_get(slow);
        api.push_get(Scripted::ready(Ok(post(2, 1, "second"))));
        let detail = PostDetailFetcher::new(Arc::clone(&api));

        let leave = async {
            tokio::task::yield_now().await;
            detail.invalidate();
            release.send(()).unwrap();
        };

        let (first, ()) = tokio::join!(detail.load(1), leave);
        assert_eq!(first.unwrap(), SyncOutcome::Discarded);
        assert_eq!(detail.view(), DetailState::Empty);

        detail.load(2).await.unwrap();
        assert!(matches!(detail.view(), DetailState::Loaded(p) if p.id == 2));
    }
}
