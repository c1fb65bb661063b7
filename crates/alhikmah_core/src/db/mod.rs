//! SQLite storage bootstrap, schema migration and change notification.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the library core.
//! - Apply schema migrations in deterministic order.
//! - Publish per-table change notifications for live queries.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write library data before migrations succeed.
//! - `reading_progress` rows carry no foreign key to `books`; deleting a book
//!   never cascades.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod changes;
pub mod migrations;
mod open;
mod store;

pub use changes::{ChangeFeed, StoreTable};
pub use migrations::MigrationPolicy;
pub use open::{open_db, open_db_in_memory, open_db_with_policy};
pub use store::Store;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
