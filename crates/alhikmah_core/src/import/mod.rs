//! Import building blocks: source handles, name resolution, private copy
//! and metadata extraction.
//!
//! # Responsibility
//! - Abstract the platform file handle granted by a picker.
//! - Copy documents into app-owned storage so later reads never depend on
//!   the original grant.
//!
//! # Invariants
//! - Copies always land directly inside the books directory; only the final
//!   path component of a display name is used.
//! - A failed copy never leaves a partial file behind and never touches an
//!   existing copy with the same name.
//!
//! The orchestration lives in [`crate::service::import_service`].

pub mod metadata;
pub mod source;

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub use metadata::{MetadataExtractor, StubMetadataExtractor};
pub use source::{resolve_display_name, ImportSource, LocalFileSource, UNKNOWN_FILE_NAME};

/// Copies `reader` into `books_dir/file_name`, replacing any existing file.
///
/// The bytes are staged in a temporary file inside `books_dir` and renamed
/// over the target only after the whole stream was written and synced.
///
/// Returns the absolute path of the copy and the number of bytes written.
pub fn copy_into_books_dir(
    reader: &mut dyn Read,
    books_dir: &Path,
    file_name: &str,
) -> io::Result<(PathBuf, u64)> {
    std::fs::create_dir_all(books_dir)?;
    let target = books_dir.join(file_name);

    let mut staged = NamedTempFile::new_in(books_dir)?;
    let written = io::copy(reader, staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    staged.persist(&target).map_err(|err| err.error)?;

    Ok((absolutize(target), written))
}

fn absolutize(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}
