//! Screen data synchronization: feed, post detail, profile
//!
//! Every fetch takes a generation ticket. Responses carrying an outdated
//! ticket are dropped, so the most recently started request wins no matter
//! which order responses arrive in.

mod detail;
mod feed;
mod profile;

use std::sync::atomic::{AtomicBool, Ordering};

pub use detail::{DetailState, FetchFailure, PostDetailFetcher};
pub use feed::{CreateOutcome, FeedSynchronizer};
pub use profile::{Profile, ProfileFetcher};

use crate::error::{Error, Result};

/// What happened to a fetched response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The response replaced the screen's data
    Applied,
    /// A newer request (or navigation away) superseded it
    Discarded,
}

/// Busy indicator that rejects a second start of the same action
#[derive(Debug)]
pub(crate) struct BusyFlag {
    name: &'static str,
    set: AtomicBool,
}

impl BusyFlag {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self {
            name,
            set: AtomicBool::new(false),
        }
    }

    pub(crate) fn is_set(&self) -> bool {
        self.set.load(Ordering::Acquire)
    }

    /// Raise the flag; it drops again when the guard goes out of scope
    pub(crate) fn begin(&self) -> Result<BusyGuard<'_>> {
        self.set
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::Busy(self.name))?;
        Ok(BusyGuard(&self.set))
    }
}

pub(crate) struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
