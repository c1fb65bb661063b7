//! Import use-case service.
//!
//! # Responsibility
//! - Run the copy → classify → extract → register flow for one source.
//!
//! # Invariants
//! - A book row is written only after the private copy is complete.
//! - Any failure aborts the whole import; no partial copy or row remains
//!   from the failing step.
//! - New books start at page 0 with `total_pages` taken from metadata.

use crate::import::metadata::{AUTHOR_KEY, PAGES_KEY, TITLE_KEY};
use crate::import::{
    copy_into_books_dir, resolve_display_name, ImportSource, MetadataExtractor,
    StubMetadataExtractor,
};
use crate::model::book::{Book, FileType, UNKNOWN_AUTHOR};
use crate::repo::library_repo::{LibraryRepository, RepoError};
use crate::time::now_epoch_ms;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Service error for import use-cases.
#[derive(Debug)]
pub enum ImportError {
    /// The source handle could not be opened (revoked grant, missing file).
    SourceUnavailable { file_name: String, source: io::Error },
    /// Copying into private storage failed.
    Copy { target: PathBuf, source: io::Error },
    /// Registering the book failed.
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceUnavailable { file_name, source } => {
                write!(f, "cannot open import source `{file_name}`: {source}")
            }
            Self::Copy { target, source } => {
                write!(f, "cannot copy into `{}`: {source}", target.display())
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SourceUnavailable { source, .. } | Self::Copy { source, .. } => Some(source),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Import pipeline over a repository and a metadata extractor.
pub struct ImportService<R: LibraryRepository, M: MetadataExtractor = StubMetadataExtractor> {
    repo: R,
    books_dir: PathBuf,
    extractor: M,
}

impl<R: LibraryRepository> ImportService<R> {
    /// Creates a service that copies into `books_dir` and uses stub metadata.
    pub fn new(repo: R, books_dir: impl Into<PathBuf>) -> Self {
        Self::with_extractor(repo, books_dir, StubMetadataExtractor)
    }
}

impl<R: LibraryRepository, M: MetadataExtractor> ImportService<R, M> {
    pub fn with_extractor(repo: R, books_dir: impl Into<PathBuf>, extractor: M) -> Self {
        Self {
            repo,
            books_dir: books_dir.into(),
            extractor,
        }
    }

    pub fn books_dir(&self) -> &Path {
        &self.books_dir
    }

    /// Imports one document and returns the stored book.
    ///
    /// # Errors
    /// - `SourceUnavailable` when the handle cannot be opened.
    /// - `Copy` when writing the private copy fails.
    /// - `Repo` when the book row cannot be written.
    pub fn import(&self, source: &dyn ImportSource) -> Result<Book, ImportError> {
        let started_at = Instant::now();
        let file_name = resolve_display_name(source);
        let file_type = FileType::from_file_name(&file_name);
        info!(
            "event=book_import module=import status=start file_type={}",
            file_type
        );

        let result = self.import_named(source, &file_name, file_type);
        match &result {
            Ok(book) => info!(
                "event=book_import module=import status=ok book_id={} file_type={} total_pages={} duration_ms={}",
                book.id,
                book.file_type,
                book.total_pages,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=book_import module=import status=error file_type={} duration_ms={} error={}",
                file_type,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn import_named(
        &self,
        source: &dyn ImportSource,
        file_name: &str,
        file_type: FileType,
    ) -> Result<Book, ImportError> {
        let mut reader = source
            .open()
            .map_err(|source| ImportError::SourceUnavailable {
                file_name: file_name.to_string(),
                source,
            })?;

        let (saved_path, _bytes) = copy_into_books_dir(&mut reader, &self.books_dir, file_name)
            .map_err(|source| ImportError::Copy {
                target: self.books_dir.join(file_name),
                source,
            })?;

        let metadata = self.extractor.extract(&saved_path, file_type);
        let title = metadata
            .get(TITLE_KEY)
            .filter(|value| !value.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| file_name.to_string());

        let mut book = Book::new(
            title,
            saved_path.to_string_lossy().into_owned(),
            file_type,
            now_epoch_ms(),
        );
        book.author = metadata
            .get(AUTHOR_KEY)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        book.total_pages = metadata
            .get(PAGES_KEY)
            .and_then(|pages| pages.trim().parse::<u32>().ok())
            .unwrap_or(0);

        book.id = self.repo.add_book(&book)?;
        Ok(book)
    }
}
