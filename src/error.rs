//! Error types for gateway calls, forms and feed operations

use thiserror::Error;

/// Shown when a request could not reach the server at all
pub const CONNECTION_MESSAGE: &str = "Cannot connect to server. Please check your connection.";

/// Errors surfaced by the client library
#[derive(Debug, Error)]
pub enum Error {
    /// Client-side validation failed (empty fields, password mismatch, ...)
    #[error("{0}")]
    Validation(String),

    /// The action needs a session and none is present
    #[error("You need to log in first")]
    AuthRequired,

    /// The server answered with a non-2xx status
    #[error("{}", http_message(.status, .message))]
    Http {
        /// HTTP status code
        status: u16,
        /// Server-provided message, if the body carried one
        message: Option<String>,
    },

    /// The request could not complete (DNS, refused, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// A single post lookup came back empty
    #[error("Post not found")]
    NotFound,

    /// The server answered 2xx but the body was not what we expected
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The same action is already in flight
    #[error("{0} already in progress")]
    Busy(&'static str),
}

#[allow(clippy::ref_option)]
fn http_message(status: &u16, message: &Option<String>) -> String {
    match message.as_deref() {
        Some(message) if !message.trim().is_empty() => message.to_string(),
        _ => format!("Request failed with status {status}"),
    }
}

impl Error {
    /// Message suitable for showing to the user, falling back to `fallback`
    /// when the server gave no explanation
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Http {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Http { .. } | Self::Decode(_) => fallback.to_string(),
            Self::Network(_) => CONNECTION_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether a GET that failed this way may be attempted again
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;
