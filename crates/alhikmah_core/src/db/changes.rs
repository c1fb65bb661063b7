//! Per-table change notification driven by the SQLite update hook.
//!
//! # Responsibility
//! - Count row-level writes on `books` and `reading_progress`.
//! - Hand out `watch` receivers so live queries know when to re-evaluate.
//!
//! # Invariants
//! - Only writes made through the hooked connection are observed.
//! - Versions only grow (wrapping); receivers compare, never interpret them.

use rusqlite::hooks::Action;
use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::watch;

/// Tables that live queries can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreTable {
    Books,
    ReadingProgress,
}

impl StoreTable {
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Books => "books",
            Self::ReadingProgress => "reading_progress",
        }
    }

    pub fn from_table_name(name: &str) -> Option<Self> {
        match name {
            "books" => Some(Self::Books),
            "reading_progress" => Some(Self::ReadingProgress),
            _ => None,
        }
    }
}

/// Change counters for the library tables of one connection.
#[derive(Debug)]
pub struct ChangeFeed {
    books: Arc<watch::Sender<u64>>,
    reading_progress: Arc<watch::Sender<u64>>,
}

impl ChangeFeed {
    /// Installs the update hook on `conn` and returns the feed it drives.
    ///
    /// Replaces any update hook previously installed on the connection.
    pub fn attach(conn: &Connection) -> Self {
        let (books, _) = watch::channel(0_u64);
        let (reading_progress, _) = watch::channel(0_u64);
        let books = Arc::new(books);
        let reading_progress = Arc::new(reading_progress);

        let hook_books = Arc::clone(&books);
        let hook_progress = Arc::clone(&reading_progress);
        conn.update_hook(Some(
            move |_action: Action, _db: &str, table: &str, _rowid: i64| {
                let sender = match StoreTable::from_table_name(table) {
                    Some(StoreTable::Books) => &hook_books,
                    Some(StoreTable::ReadingProgress) => &hook_progress,
                    None => return,
                };
                sender.send_modify(|version| *version = version.wrapping_add(1));
            },
        ));

        Self {
            books,
            reading_progress,
        }
    }

    /// Subscribes to changes of one table. The current version counts as seen.
    pub fn subscribe(&self, table: StoreTable) -> watch::Receiver<u64> {
        self.sender(table).subscribe()
    }

    /// Returns the number of row writes observed on `table` so far.
    pub fn version(&self, table: StoreTable) -> u64 {
        *self.sender(table).borrow()
    }

    fn sender(&self, table: StoreTable) -> &watch::Sender<u64> {
        match table {
            StoreTable::Books => &self.books,
            StoreTable::ReadingProgress => &self.reading_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeFeed, StoreTable};
    use crate::db::open_db_in_memory;

    #[test]
    fn writes_bump_only_the_touched_table() {
        let conn = open_db_in_memory().expect("in-memory db should open");
        let feed = ChangeFeed::attach(&conn);

        conn.execute(
            "INSERT INTO reading_progress (book_id, timestamp, page_number, percentage)
             VALUES (1, 10, 0, 0.0);",
            [],
        )
        .unwrap();

        assert_eq!(feed.version(StoreTable::ReadingProgress), 1);
        assert_eq!(feed.version(StoreTable::Books), 0);
    }

    #[test]
    fn subscriber_sees_change_after_write() {
        let conn = open_db_in_memory().expect("in-memory db should open");
        let feed = ChangeFeed::attach(&conn);
        let receiver = feed.subscribe(StoreTable::Books);
        assert!(!receiver.has_changed().unwrap());

        conn.execute(
            "INSERT INTO books (title, file_path, file_type, last_read_time, added_time)
             VALUES ('t', '/tmp/t.pdf', 'PDF', 1, 1);",
            [],
        )
        .unwrap();

        assert!(receiver.has_changed().unwrap());
    }

    #[test]
    fn table_names_roundtrip() {
        for table in [StoreTable::Books, StoreTable::ReadingProgress] {
            assert_eq!(StoreTable::from_table_name(table.table_name()), Some(table));
        }
        assert_eq!(StoreTable::from_table_name("sqlite_sequence"), None);
    }
}
