//! Owned connection plus its change feed.

use super::changes::ChangeFeed;
use super::migrations::MigrationPolicy;
use super::open::{open_db_in_memory, open_db_with_policy};
use super::DbResult;
use rusqlite::Connection;
use std::path::Path;

/// Migrated library database with change notification attached.
///
/// Repositories and live queries borrow the store; the store itself is
/// owned by the library context for the process lifetime.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    changes: ChangeFeed,
}

impl Store {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>, policy: MigrationPolicy) -> DbResult<Self> {
        let conn = open_db_with_policy(path, policy)?;
        Ok(Self::from_connection(conn))
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps an already migrated connection and installs the change hook.
    pub fn from_connection(conn: Connection) -> Self {
        let changes = ChangeFeed::attach(&conn);
        Self { conn, changes }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn changes(&self) -> &ChangeFeed {
        &self.changes
    }
}
