//! App root
//!
//! Builds the shared components once at startup and decides whether the
//! user starts at the login screen or the feed.

use anyhow::Result;
use std::sync::Arc;

use crate::api::{ApiClient, FeedApi};
use crate::auth::AuthFlow;
use crate::config::Config;
use crate::session::{EncryptedFileStore, SessionContext, SessionStore};
use crate::sync::{FeedSynchronizer, PostDetailFetcher, ProfileFetcher};

/// Top-level destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login screen
    Login,
    /// Post feed
    Feed,
}

/// Application root holding configuration, the API client and the session
pub struct App<A = ApiClient> {
    config: Config,
    api: Arc<A>,
    session: SessionContext,
}

impl App<ApiClient> {
    /// Load config, restore the stored session and build the API client.
    ///
    /// An unreadable config or data directory does not stop the app: it
    /// starts with default settings and a session that lives in memory.
    pub fn init() -> Result<Self> {
        Self::assemble(Config::load(), EncryptedFileStore::open())
    }

    fn assemble(config: Result<Config>, store: Result<EncryptedFileStore>) -> Result<Self> {
        let config = config.unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {:#}", e);
            Config::default()
        });
        let store = match store {
            Ok(store) => SessionStore::new(store),
            Err(e) => {
                tracing::warn!("Session storage unavailable, logins will not persist: {:#}", e);
                SessionStore::in_memory()
            }
        };

        let session = SessionContext::load(store);
        let api = ApiClient::new(&config)?;

        tracing::debug!(base_url = api.base_url(), "API client ready");

        Ok(Self::with_parts(config, Arc::new(api), session))
    }
}

impl<A: FeedApi> App<A> {
    /// Assemble from already-built parts
    pub const fn with_parts(config: Config, api: Arc<A>, session: SessionContext) -> Self {
        Self {
            config,
            api,
            session,
        }
    }

    /// Login when there is no session, otherwise the feed
    pub fn initial_route(&self) -> Route {
        if self.session.is_authenticated() {
            Route::Feed
        } else {
            Route::Login
        }
    }

    /// Loaded configuration
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Shared API client
    pub const fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Shared session
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Login/signup forms
    pub fn auth(&self) -> AuthFlow<A> {
        AuthFlow::new(
            Arc::clone(&self.api),
            self.session.clone(),
            self.config.email_domain.clone(),
        )
    }

    /// Feed screen
    pub fn feed(&self) -> FeedSynchronizer<A> {
        FeedSynchronizer::new(Arc::clone(&self.api), self.session.clone())
    }

    /// Post detail screen
    pub fn post_detail(&self) -> PostDetailFetcher<A> {
        PostDetailFetcher::new(Arc::clone(&self.api))
    }

    /// Profile screen
    pub fn profile(&self) -> ProfileFetcher<A> {
        ProfileFetcher::new(Arc::clone(&self.api), self.session.clone())
    }

    /// Drop the session and go back to login
    pub fn logout(&self) -> Route {
        self.session.clear();
        Route::Login
    }
}
