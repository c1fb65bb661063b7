//! Core domain logic for the Al-Hikmah reader.
//! This crate is the single source of truth for library invariants.

pub mod config;
pub mod db;
pub mod import;
pub mod library;
pub mod logging;
pub mod model;
pub mod reader;
pub mod repo;
pub mod service;
pub mod time;

pub use config::{ConfigError, LibraryConfig};
pub use db::{MigrationPolicy, Store};
pub use import::{ImportSource, LocalFileSource, MetadataExtractor, StubMetadataExtractor};
pub use library::{Library, LibraryError};
pub use logging::{default_log_level, init_logging, init_logging_for, logging_status};
pub use model::book::{Book, BookId, BookValidationError, FileType};
pub use model::progress::{
    completion_percentage, ProgressId, ProgressValidationError, ReadingProgress,
};
pub use reader::{
    DocumentRenderer, FitPolicy, PageJumpDialog, ReaderState, RenderConfig, RenderError,
    RendererEvent, SwipeDirection,
};
pub use repo::library_repo::{LibraryRepository, RepoError, RepoResult, SqliteLibraryRepository};
pub use repo::live::LiveQuery;
pub use service::import_service::{ImportError, ImportService};
pub use service::reader_service::{ReaderError, ReaderSession};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
