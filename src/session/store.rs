//! Session Store: the two session fields over durable key-value storage

use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::models::Session;

/// Storage key for the bearer token
pub const TOKEN_KEY: &str = "token";
/// Storage key for the user ID
pub const USER_ID_KEY: &str = "userId";

/// Durable string key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value (missing keys are not an error)
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store, lost on exit
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// Reads and writes the session record.
///
/// The two fields are stored and read independently; a half-written
/// record is reported as "no session", never as an error.
pub struct SessionStore {
    backend: Box<dyn KeyValueStore>,
}

impl SessionStore {
    /// Wrap a key-value backend
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Session backed by an in-memory store
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    fn read_field(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read session field {}: {:#}", key, e);
                None
            }
        }
    }

    /// Stored bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.read_field(TOKEN_KEY)
    }

    /// Stored user ID, if any
    pub fn user_id(&self) -> Option<String> {
        self.read_field(USER_ID_KEY)
    }

    /// Current session; absent unless both fields are present
    pub fn get(&self) -> Option<Session> {
        let token = self.token();
        let user_id = self.user_id();

        match (token, user_id) {
            (Some(token), Some(user_id)) => Some(Session { token, user_id }),
            (None, None) => None,
            (token, user_id) => {
                tracing::debug!(
                    has_token = token.is_some(),
                    has_user_id = user_id.is_some(),
                    "Partial session record, treating as logged out"
                );
                None
            }
        }
    }

    /// Persist both fields
    pub fn set(&self, session: &Session) -> Result<()> {
        self.backend.set(TOKEN_KEY, &session.token)?;
        self.backend.set(USER_ID_KEY, &session.user_id)?;
        Ok(())
    }

    /// Remove both fields; both removals are attempted even if one fails
    pub fn clear(&self) -> Result<()> {
        let token = self.backend.remove(TOKEN_KEY);
        let user_id = self.backend.remove(USER_ID_KEY);
        token.and(user_id)
    }
}
