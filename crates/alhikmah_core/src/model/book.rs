//! Book domain model.
//!
//! # Responsibility
//! - Define the imported-document record and its reading state.
//! - Classify documents by file name.
//!
//! # Invariants
//! - `file_path` points at the app-owned copy, never the original source.
//! - When `total_pages > 0`, `current_page < total_pages`.
//! - `server_id`/`synced_with_server` are persisted but never acted on.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned book identifier. `0` marks a book that is not persisted.
pub type BookId = i64;

/// Author recorded when metadata does not provide one.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Document format detected from the file name at import time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "EPUB")]
    Epub,
    Unknown,
}

impl FileType {
    /// Classifies a file by case-insensitive extension suffix.
    pub fn from_file_name(file_name: &str) -> Self {
        let lowered = file_name.to_ascii_lowercase();
        if lowered.ends_with(".pdf") {
            Self::Pdf
        } else if lowered.ends_with(".epub") {
            Self::Epub
        } else {
            Self::Unknown
        }
    }

    /// Stable storage/display label (`PDF`, `EPUB`, `Unknown`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Epub => "EPUB",
            Self::Unknown => "Unknown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PDF" => Some(Self::Pdf),
            "EPUB" => Some(Self::Epub),
            "Unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for [`Book`] records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyTitle,
    EmptyFilePath,
    NegativeId(BookId),
    PageOutOfRange { current_page: u32, total_pages: u32 },
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "book title cannot be empty"),
            Self::EmptyFilePath => write!(f, "book file path cannot be empty"),
            Self::NegativeId(id) => write!(f, "book id cannot be negative: {id}"),
            Self::PageOutOfRange {
                current_page,
                total_pages,
            } => write!(
                f,
                "current page {current_page} is outside 0..{total_pages}"
            ),
        }
    }
}

impl Error for BookValidationError {}

/// One imported document with its reading state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Absolute path of the private copy under the books directory.
    pub file_path: String,
    pub file_type: FileType,
    pub cover_path: Option<String>,
    /// `0` until the renderer reports a page count.
    pub total_pages: u32,
    /// 0-based.
    pub current_page: u32,
    /// Unix epoch milliseconds.
    pub last_read_time: i64,
    /// Unix epoch milliseconds.
    pub added_time: i64,
    pub is_favorite: bool,
    pub synced_with_server: bool,
    pub server_id: Option<String>,
}

impl Book {
    /// Creates an unsaved book stamped with `now` for both timestamps.
    pub fn new(
        title: impl Into<String>,
        file_path: impl Into<String>,
        file_type: FileType,
        now: i64,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            author: UNKNOWN_AUTHOR.to_string(),
            file_path: file_path.into(),
            file_type,
            cover_path: None,
            total_pages: 0,
            current_page: 0,
            last_read_time: now,
            added_time: now,
            is_favorite: false,
            synced_with_server: false,
            server_id: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// Whole-number completion shown on library cards.
    pub fn progress_percent(&self) -> u32 {
        if self.total_pages == 0 {
            return 0;
        }
        let percent = u64::from(self.current_page) * 100 / u64::from(self.total_pages);
        percent.min(100) as u32
    }

    /// Clamps `page` into `[0, total_pages)`; unchanged while the count is unknown.
    pub fn clamp_page(&self, page: u32) -> u32 {
        if self.total_pages == 0 {
            page
        } else {
            page.min(self.total_pages - 1)
        }
    }

    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.id < 0 {
            return Err(BookValidationError::NegativeId(self.id));
        }
        if self.title.trim().is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        if self.file_path.trim().is_empty() {
            return Err(BookValidationError::EmptyFilePath);
        }
        if self.total_pages > 0 && self.current_page >= self.total_pages {
            return Err(BookValidationError::PageOutOfRange {
                current_page: self.current_page,
                total_pages: self.total_pages,
            });
        }
        Ok(())
    }
}
