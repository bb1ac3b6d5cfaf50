//! Configuration module for campusfeed

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::paths;

/// Environment variable (build-time or runtime) overriding the API base URL
pub const API_URL_ENV: &str = "CAMPUSFEED_API_URL";

/// Base URL used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://192.168.1.6:3000";

/// Institutional domain appended to login usernames
pub const DEFAULT_EMAIL_DOMAIN: &str = "@teknokrat.ac.id";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Explicit API base URL (takes precedence over the environment)
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Total attempts for idempotent GET requests
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Delay between GET attempts, multiplied by the attempt number
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Domain appended to the username on login
    #[serde(default = "default_email_domain")]
    pub email_domain: String,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    250
}

fn default_email_domain() -> String {
    DEFAULT_EMAIL_DOMAIN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_ms: default_request_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            email_domain: default_email_domain(),
        }
    }
}

impl Config {
    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = paths::config_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the API base URL: config value, then the build-time
    /// environment, then the runtime environment, then the fallback
    pub fn resolve_base_url(&self) -> String {
        let runtime = std::env::var(API_URL_ENV).ok();
        resolve_base_url(&[
            self.api_base_url.as_deref(),
            option_env!("CAMPUSFEED_API_URL"),
            runtime.as_deref(),
        ])
    }

    /// Request timeout as a [`Duration`]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Backoff before retry number `attempt` (1-based)
    pub const fn retry_backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(attempt as u64))
    }
}

/// First non-empty candidate wins; trailing slashes are dropped
pub fn resolve_base_url(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .map(|url| url.trim())
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}
