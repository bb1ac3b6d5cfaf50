//! Session handling
//!
//! [`SessionStore`] persists the token/user-id pair; [`SessionContext`] is
//! the in-process handle every component shares. It is built once at
//! startup and is the only place the session changes.

mod encrypted;
mod store;

use std::sync::{Arc, PoisonError, RwLock};

pub use encrypted::{EncryptedFileStore, derive_key};
pub use store::{KeyValueStore, MemoryStore, SessionStore, TOKEN_KEY, USER_ID_KEY};

use crate::models::Session;

/// Whether an established session made it to durable storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Written to storage; survives a restart
    Durable,
    /// Storage write failed; the session lasts only for this process
    MemoryOnly,
}

/// Shared, cloneable session handle
#[derive(Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
    store: Arc<SessionStore>,
}

impl SessionContext {
    /// Read the stored session once and wrap the store
    pub fn load(store: SessionStore) -> Self {
        let current = store.get();
        Self {
            current: Arc::new(RwLock::new(current)),
            store: Arc::new(store),
        }
    }

    /// Context with no persistence beyond this process
    pub fn in_memory() -> Self {
        Self::load(SessionStore::in_memory())
    }

    /// Current session, if logged in
    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a session is present
    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Logged-in user's ID as stored
    pub fn user_id(&self) -> Option<String> {
        self.current().map(|s| s.user_id)
    }

    /// Make `session` the current session and try to persist it.
    ///
    /// A storage failure is logged and reported, never returned as an error:
    /// the user stays logged in until the process exits.
    pub fn establish(&self, session: Session) -> Persistence {
        let persistence = match self.store.set(&session) {
            Ok(()) => Persistence::Durable,
            Err(e) => {
                tracing::warn!("Failed to persist session, it will not survive a restart: {:#}", e);
                Persistence::MemoryOnly
            }
        };

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        persistence
    }

    /// Log out. Best-effort: the in-memory session is always dropped.
    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;

        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to remove stored session: {:#}", e);
        }
    }
}
