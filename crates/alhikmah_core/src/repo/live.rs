//! Live (re-evaluable) queries over the library store.
//!
//! # Responsibility
//! - Pair a query with a change subscription on the table it reads.
//! - Let callers poll synchronously or await the next change.
//!
//! # Invariants
//! - Creating a `LiveQuery` subscribes; dropping it unsubscribes.
//! - `current()` always re-reads storage and marks pending changes as seen.

use crate::repo::library_repo::{RepoError, RepoResult};
use rusqlite::Connection;
use tokio::sync::watch;

type Fetch<'store, T> = Box<dyn Fn(&Connection) -> RepoResult<T> + 'store>;

/// Query result stream bound to one store table.
pub struct LiveQuery<'store, T> {
    conn: &'store Connection,
    changes: watch::Receiver<u64>,
    fetch: Fetch<'store, T>,
}

impl<'store, T> LiveQuery<'store, T> {
    pub(crate) fn new(
        conn: &'store Connection,
        changes: watch::Receiver<u64>,
        fetch: impl Fn(&Connection) -> RepoResult<T> + 'store,
    ) -> Self {
        Self {
            conn,
            changes,
            fetch: Box::new(fetch),
        }
    }

    /// Evaluates the query now.
    pub fn current(&mut self) -> RepoResult<T> {
        drop(self.changes.borrow_and_update());
        (self.fetch)(self.conn)
    }

    /// Whether the observed table was written since the last evaluation.
    pub fn has_changed(&self) -> bool {
        self.changes.has_changed().unwrap_or(false)
    }

    /// Returns a fresh result only when the observed table changed.
    pub fn poll(&mut self) -> RepoResult<Option<T>> {
        if !self.has_changed() {
            return Ok(None);
        }
        self.current().map(Some)
    }

    /// Waits for the next write to the observed table, then re-evaluates.
    ///
    /// # Errors
    /// - `RepoError::FeedClosed` when the owning store was dropped.
    pub async fn next(&mut self) -> RepoResult<T> {
        self.changes
            .changed()
            .await
            .map_err(|_| RepoError::FeedClosed)?;
        self.current()
    }
}
