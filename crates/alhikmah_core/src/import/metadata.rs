//! Document metadata extraction.
//!
//! Only a file-name based stub exists; format-aware extraction plugs in
//! through [`MetadataExtractor`].

use crate::model::book::{FileType, UNKNOWN_AUTHOR};
use std::collections::BTreeMap;
use std::path::Path;

pub const TITLE_KEY: &str = "title";
pub const AUTHOR_KEY: &str = "author";
pub const PAGES_KEY: &str = "pages";

/// Extracts loosely typed metadata (`title`, `author`, `pages`) from a copy.
pub trait MetadataExtractor {
    fn extract(&self, path: &Path, file_type: FileType) -> BTreeMap<String, String>;
}

/// Derives the title from the file stem and reports nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubMetadataExtractor;

impl MetadataExtractor for StubMetadataExtractor {
    fn extract(&self, path: &Path, _file_type: FileType) -> BTreeMap<String, String> {
        let mut metadata = BTreeMap::new();
        if let Some(stem) = path.file_stem() {
            metadata.insert(TITLE_KEY.to_string(), stem.to_string_lossy().into_owned());
        }
        metadata.insert(AUTHOR_KEY.to_string(), UNKNOWN_AUTHOR.to_string());
        metadata.insert(PAGES_KEY.to_string(), "0".to_string());
        metadata
    }
}
