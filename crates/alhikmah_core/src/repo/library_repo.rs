//! Library repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `books` and append-only writes over `reading_progress`.
//! - Expose live queries for list/detail/history consumers.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate records before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Book lists are ordered by `last_read_time DESC, id DESC`.
//! - History is ordered by `timestamp DESC, id DESC`.
//! - Deleting a book leaves its progress rows in place.

use crate::db::{DbError, Store, StoreTable};
use crate::model::book::{Book, BookId, BookValidationError, FileType};
use crate::model::progress::{ProgressId, ProgressValidationError, ReadingProgress};
use crate::repo::live::LiveQuery;
use crate::time::now_epoch_ms;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    file_path,
    file_type,
    cover_path,
    total_pages,
    current_page,
    last_read_time,
    added_time,
    is_favorite,
    synced_with_server,
    server_id
FROM books";

const BOOK_ORDER_SQL: &str = "ORDER BY last_read_time DESC, id DESC";

const PROGRESS_SELECT_SQL: &str = "SELECT
    id,
    book_id,
    timestamp,
    page_number,
    percentage,
    duration_seconds
FROM reading_progress";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for library persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    InvalidBook(BookValidationError),
    InvalidProgress(ProgressValidationError),
    Db(DbError),
    NotFound(BookId),
    InvalidData(String),
    /// The store backing a live query no longer exists.
    FeedClosed,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBook(err) => write!(f, "{err}"),
            Self::InvalidProgress(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted library data: {message}"),
            Self::FeedClosed => write!(f, "library store was closed"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidBook(err) => Some(err),
            Self::InvalidProgress(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::FeedClosed => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::InvalidBook(value)
    }
}

impl From<ProgressValidationError> for RepoError {
    fn from(value: ProgressValidationError) -> Self {
        Self::InvalidProgress(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for books and reading sessions.
pub trait LibraryRepository {
    /// Inserts a book. A non-zero `id` replaces the row with that id.
    fn add_book(&self, book: &Book) -> RepoResult<BookId>;
    /// Overwrites every column of the row keyed by `book.id`.
    fn update_book(&self, book: &Book) -> RepoResult<()>;
    /// Removes the book row only; progress history is kept.
    fn delete_book(&self, book: &Book) -> RepoResult<()>;
    fn find_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn all_books(&self) -> RepoResult<Vec<Book>>;
    fn favorite_books(&self) -> RepoResult<Vec<Book>>;
    /// Sets `current_page` and `last_read_time` in one statement.
    ///
    /// # Errors
    /// - `RepoError::InvalidBook(PageOutOfRange)` when the book has a known
    ///   page count and `page` is past it.
    /// - `RepoError::NotFound` when no such book exists.
    fn update_reading_progress_at(&self, id: BookId, page: u32, timestamp: i64)
        -> RepoResult<()>;
    /// Appends one snapshot as given.
    fn insert_progress(&self, progress: &ReadingProgress) -> RepoResult<ProgressId>;
    fn reading_history(&self, id: BookId) -> RepoResult<Vec<ReadingProgress>>;

    /// Same as [`update_reading_progress_at`](Self::update_reading_progress_at) stamped with now.
    fn update_reading_progress(&self, id: BookId, page: u32) -> RepoResult<()> {
        self.update_reading_progress_at(id, page, now_epoch_ms())
    }

    /// Appends a snapshot stamped with now.
    fn save_reading_session(
        &self,
        id: BookId,
        page: u32,
        percentage: f32,
        duration_seconds: u32,
    ) -> RepoResult<ProgressId> {
        let progress = ReadingProgress::new(id, page, percentage, duration_seconds, now_epoch_ms());
        self.insert_progress(&progress)
    }
}

/// SQLite-backed library repository.
#[derive(Clone, Copy)]
pub struct SqliteLibraryRepository<'store> {
    store: &'store Store,
}

impl<'store> SqliteLibraryRepository<'store> {
    pub fn new(store: &'store Store) -> Self {
        Self { store }
    }

    fn conn(&self) -> &'store Connection {
        self.store.conn()
    }

    /// All books, most recently read first, refreshed on every `books` write.
    pub fn list_all_books(&self) -> LiveQuery<'store, Vec<Book>> {
        LiveQuery::new(
            self.conn(),
            self.store.changes().subscribe(StoreTable::Books),
            load_all_books,
        )
    }

    /// Favorite books, most recently read first.
    pub fn list_favorites(&self) -> LiveQuery<'store, Vec<Book>> {
        LiveQuery::new(
            self.conn(),
            self.store.changes().subscribe(StoreTable::Books),
            load_favorite_books,
        )
    }

    /// One book, `None` once it is absent or deleted.
    pub fn get_book(&self, id: BookId) -> LiveQuery<'store, Option<Book>> {
        LiveQuery::new(
            self.conn(),
            self.store.changes().subscribe(StoreTable::Books),
            move |conn| load_book(conn, id),
        )
    }

    /// Progress snapshots of one book, newest first.
    pub fn get_reading_history(&self, id: BookId) -> LiveQuery<'store, Vec<ReadingProgress>> {
        LiveQuery::new(
            self.conn(),
            self.store.changes().subscribe(StoreTable::ReadingProgress),
            move |conn| load_history(conn, id),
        )
    }
}

impl LibraryRepository for SqliteLibraryRepository<'_> {
    fn add_book(&self, book: &Book) -> RepoResult<BookId> {
        book.validate()?;

        // NULL id lets SQLite assign the next rowid.
        let id = book.is_persisted().then_some(book.id);
        self.conn().execute(
            "INSERT OR REPLACE INTO books (
                id,
                title,
                author,
                file_path,
                file_type,
                cover_path,
                total_pages,
                current_page,
                last_read_time,
                added_time,
                is_favorite,
                synced_with_server,
                server_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                id,
                book.title.as_str(),
                book.author.as_str(),
                book.file_path.as_str(),
                book.file_type.as_str(),
                book.cover_path.as_deref(),
                book.total_pages,
                book.current_page,
                book.last_read_time,
                book.added_time,
                bool_to_int(book.is_favorite),
                bool_to_int(book.synced_with_server),
                book.server_id.as_deref(),
            ],
        )?;

        Ok(self.conn().last_insert_rowid())
    }

    fn update_book(&self, book: &Book) -> RepoResult<()> {
        book.validate()?;

        let changed = self.conn().execute(
            "UPDATE books
             SET
                title = ?1,
                author = ?2,
                file_path = ?3,
                file_type = ?4,
                cover_path = ?5,
                total_pages = ?6,
                current_page = ?7,
                last_read_time = ?8,
                added_time = ?9,
                is_favorite = ?10,
                synced_with_server = ?11,
                server_id = ?12
             WHERE id = ?13;",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.file_path.as_str(),
                book.file_type.as_str(),
                book.cover_path.as_deref(),
                book.total_pages,
                book.current_page,
                book.last_read_time,
                book.added_time,
                bool_to_int(book.is_favorite),
                bool_to_int(book.synced_with_server),
                book.server_id.as_deref(),
                book.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(book.id));
        }

        Ok(())
    }

    fn delete_book(&self, book: &Book) -> RepoResult<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM books WHERE id = ?1;", [book.id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(book.id));
        }

        Ok(())
    }

    fn find_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        load_book(self.conn(), id)
    }

    fn all_books(&self) -> RepoResult<Vec<Book>> {
        load_all_books(self.conn())
    }

    fn favorite_books(&self) -> RepoResult<Vec<Book>> {
        load_favorite_books(self.conn())
    }

    fn update_reading_progress_at(
        &self,
        id: BookId,
        page: u32,
        timestamp: i64,
    ) -> RepoResult<()> {
        let changed = self.conn().execute(
            "UPDATE books
             SET
                current_page = ?2,
                last_read_time = ?3
             WHERE id = ?1
               AND (total_pages = 0 OR ?2 < total_pages);",
            params![id, page, timestamp],
        )?;

        if changed == 0 {
            let total_pages: Option<u32> = self
                .conn()
                .query_row(
                    "SELECT total_pages FROM books WHERE id = ?1;",
                    [id],
                    |row| row.get(0),
                )
                .optional()?;
            return Err(match total_pages {
                Some(total_pages) => BookValidationError::PageOutOfRange {
                    current_page: page,
                    total_pages,
                }
                .into(),
                None => RepoError::NotFound(id),
            });
        }

        Ok(())
    }

    fn insert_progress(&self, progress: &ReadingProgress) -> RepoResult<ProgressId> {
        progress.validate()?;

        self.conn().execute(
            "INSERT INTO reading_progress (
                book_id,
                timestamp,
                page_number,
                percentage,
                duration_seconds
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                progress.book_id,
                progress.timestamp,
                progress.page_number,
                progress.percentage,
                progress.duration_seconds,
            ],
        )?;

        Ok(self.conn().last_insert_rowid())
    }

    fn reading_history(&self, id: BookId) -> RepoResult<Vec<ReadingProgress>> {
        load_history(self.conn(), id)
    }
}

fn load_book(conn: &Connection, id: BookId) -> RepoResult<Option<Book>> {
    let mut stmt = conn.prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
    let raw = stmt
        .query_row([id], |row| Ok(read_book_row(row)))
        .optional()?;
    raw.transpose()
}

fn load_all_books(conn: &Connection) -> RepoResult<Vec<Book>> {
    query_books(conn, &format!("{BOOK_SELECT_SQL} {BOOK_ORDER_SQL};"))
}

fn load_favorite_books(conn: &Connection) -> RepoResult<Vec<Book>> {
    query_books(
        conn,
        &format!("{BOOK_SELECT_SQL} WHERE is_favorite = 1 {BOOK_ORDER_SQL};"),
    )
}

fn query_books(conn: &Connection, sql: &str) -> RepoResult<Vec<Book>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut books = Vec::new();
    while let Some(row) = rows.next()? {
        books.push(read_book_row(row)?);
    }
    Ok(books)
}

fn load_history(conn: &Connection, id: BookId) -> RepoResult<Vec<ReadingProgress>> {
    let mut stmt = conn.prepare(&format!(
        "{PROGRESS_SELECT_SQL}
         WHERE book_id = ?1
         ORDER BY timestamp DESC, id DESC;"
    ))?;
    let mut rows = stmt.query([id])?;
    let mut history = Vec::new();
    while let Some(row) = rows.next()? {
        history.push(ReadingProgress {
            id: row.get("id")?,
            book_id: row.get("book_id")?,
            timestamp: row.get("timestamp")?,
            page_number: row.get("page_number")?,
            percentage: row.get("percentage")?,
            duration_seconds: row.get("duration_seconds")?,
        });
    }
    Ok(history)
}

fn read_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let type_text: String = row.get("file_type")?;
    let file_type = FileType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid file type `{type_text}` in books.file_type"))
    })?;

    let book = Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        file_path: row.get("file_path")?,
        file_type,
        cover_path: row.get("cover_path")?,
        total_pages: row.get("total_pages")?,
        current_page: row.get("current_page")?,
        last_read_time: row.get("last_read_time")?,
        added_time: row.get("added_time")?,
        is_favorite: parse_flag(row, "is_favorite")?,
        synced_with_server: parse_flag(row, "synced_with_server")?,
        server_id: row.get("server_id")?,
    };
    book.validate()?;
    Ok(book)
}

fn parse_flag(row: &Row<'_>, column: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid {column} value `{other}` in books.{column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
