//! # campusfeed
//!
//! A terminal client for the campus social feed.
//!
//! ## Overview
//!
//! campusfeed logs in against the campus REST backend, keeps the session on
//! disk, and lets you read the post feed, publish posts, open a single post
//! and look at your profile.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          App                                │
//! │   Restores the session and routes to Login or Feed          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │      Auth       │ │      Sync       │ │     Config      │
//! │                 │ │                 │ │                 │
//! │ • Login form    │ │ • Feed          │ │ • Base URL      │
//! │ • Signup form   │ │ • Post detail   │ │ • Timeout/retry │
//! │                 │ │ • Profile       │ │ • Email domain  │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │                   │
//!          └─────────┬─────────┘
//!                    ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │     Session     │ │       API       │ │     Models      │
//! │                 │ │                 │ │                 │
//! │ • Token/user id │ │ • Endpoints     │ │ • Post          │
//! │ • Encrypted file│ │ • GET retries   │ │ • User          │
//! │ • Shared context│ │ • Timeouts      │ │ • Session       │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST gateway and the [`api::FeedApi`] trait
//! - [`app`] - App root and routing
//! - [`auth`] - Login and signup flows
//! - [`config`] - Configuration management
//! - [`error`] - Error taxonomy
//! - [`models`] - Data models (Post, User, Session)
//! - [`session`] - Session persistence
//! - [`sync`] - Feed, post detail and profile fetching
//! - [`time`] - Relative timestamps
//!
//! ## Example
//!
//! ```no_run
//! use campusfeed::{App, Route};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::init()?;
//!     if app.initial_route() == Route::Feed {
//!         let feed = app.feed();
//!         feed.load().await?;
//!         for post in feed.posts() {
//!             println!("{} · {}", post.author_name(), post.relative_time());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::significant_drop_tightening)]

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod paths;
pub mod session;
pub mod sync;
pub mod time;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use api::{ApiClient, FeedApi};
pub use app::{App, Route};
pub use config::Config;
pub use error::{Error, Result};
pub use models::{Post, Session, User};
pub use session::SessionContext;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
