//! Process-level library context.
//!
//! # Responsibility
//! - Build every long-lived dependency once at startup (config, store).
//! - Hand out repositories, the import service and reader sessions that
//!   borrow those dependencies.
//!
//! # Invariants
//! - The configuration is validated before anything touches disk.
//! - The books directory exists once `Library::open` returns.

use crate::config::{ConfigError, LibraryConfig};
use crate::db::{DbError, Store};
use crate::model::book::{Book, BookId};
use crate::reader::renderer::DocumentRenderer;
use crate::repo::library_repo::{LibraryRepository, RepoError, SqliteLibraryRepository};
use crate::service::import_service::ImportService;
use crate::service::reader_service::ReaderSession;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// Failure while constructing the library context.
#[derive(Debug)]
pub enum LibraryError {
    Config(ConfigError),
    Io(io::Error),
    Db(DbError),
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ConfigError> for LibraryError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<io::Error> for LibraryError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for LibraryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Explicitly constructed dependency root for one process.
#[derive(Debug)]
pub struct Library {
    config: LibraryConfig,
    store: Store,
}

impl Library {
    /// Validates `config`, prepares directories and opens the database.
    pub fn open(config: LibraryConfig) -> Result<Self, LibraryError> {
        config.validate()?;
        std::fs::create_dir_all(config.books_dir())?;
        let store = Store::open(config.database_path(), config.migration_policy())?;
        info!(
            "event=library_open module=library status=ok policy={:?}",
            config.migration_policy()
        );
        Ok(Self { config, store })
    }

    /// Builds a library over an existing store. Directories are not created.
    pub fn with_store(config: LibraryConfig, store: Store) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn repository(&self) -> SqliteLibraryRepository<'_> {
        SqliteLibraryRepository::new(&self.store)
    }

    pub fn import_service(&self) -> ImportService<SqliteLibraryRepository<'_>> {
        ImportService::new(self.repository(), self.config.books_dir())
    }

    /// Loads book `id` and opens it in `renderer`.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when no such book exists.
    pub fn open_reader<V: DocumentRenderer>(
        &self,
        id: BookId,
        renderer: V,
    ) -> Result<ReaderSession<SqliteLibraryRepository<'_>, V>, RepoError> {
        let repo = self.repository();
        let book: Book = repo.find_book(id)?.ok_or(RepoError::NotFound(id))?;
        Ok(ReaderSession::with_snapshot_interval(
            repo,
            renderer,
            book,
            self.config.snapshot_interval_pages,
        ))
    }
}
