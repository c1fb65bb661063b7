//! Source handles and display-name resolution.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Name used when neither provider metadata nor the path yields one.
pub const UNKNOWN_FILE_NAME: &str = "Unknown";

/// A user-granted, possibly short-lived handle to a document.
///
/// Platform adapters (content providers, document pickers) implement this;
/// [`LocalFileSource`] covers plain filesystem paths.
pub trait ImportSource {
    /// Name reported by the platform's metadata, if any.
    fn display_name(&self) -> Option<String>;
    /// Path-like string for the handle (a URI path or filesystem path).
    fn path_hint(&self) -> Option<String>;
    /// Opens the full byte stream.
    fn open(&self) -> io::Result<Box<dyn Read + '_>>;
}

/// Source backed by a regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImportSource for LocalFileSource {
    fn display_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    fn path_hint(&self) -> Option<String> {
        Some(self.path.to_string_lossy().into_owned())
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }
}

/// Resolves the file name to store an import under.
///
/// Order: provider display name, trailing segment of the path hint,
/// [`UNKNOWN_FILE_NAME`]. The result is always a single path component.
pub fn resolve_display_name(source: &dyn ImportSource) -> String {
    source
        .display_name()
        .and_then(|name| last_segment(&name))
        .or_else(|| source.path_hint().and_then(|hint| last_segment(&hint)))
        .unwrap_or_else(|| UNKNOWN_FILE_NAME.to_string())
}

fn last_segment(value: &str) -> Option<String> {
    let segment = value.rsplit(['/', '\\']).next()?.trim();
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::{resolve_display_name, ImportSource, LocalFileSource, UNKNOWN_FILE_NAME};
    use std::io::{self, Read};

    struct StubSource {
        name: Option<&'static str>,
        path: Option<&'static str>,
    }

    impl ImportSource for StubSource {
        fn display_name(&self) -> Option<String> {
            self.name.map(str::to_string)
        }

        fn path_hint(&self) -> Option<String> {
            self.path.map(str::to_string)
        }

        fn open(&self) -> io::Result<Box<dyn Read + '_>> {
            Ok(Box::new(io::empty()))
        }
    }

    #[test]
    fn provider_name_wins() {
        let source = StubSource {
            name: Some("Tafsir.pdf"),
            path: Some("/document/primary:Download/other.pdf"),
        };
        assert_eq!(resolve_display_name(&source), "Tafsir.pdf");
    }

    #[test]
    fn falls_back_to_path_trailing_segment() {
        let source = StubSource {
            name: None,
            path: Some("/storage/emulated/0/Download/story.epub"),
        };
        assert_eq!(resolve_display_name(&source), "story.epub");
    }

    #[test]
    fn defaults_to_unknown() {
        let source = StubSource {
            name: None,
            path: Some("/storage/"),
        };
        assert_eq!(resolve_display_name(&source), UNKNOWN_FILE_NAME);

        let empty = StubSource {
            name: None,
            path: None,
        };
        assert_eq!(resolve_display_name(&empty), UNKNOWN_FILE_NAME);
    }

    #[test]
    fn provider_name_is_reduced_to_one_component() {
        let source = StubSource {
            name: Some("../../escape.pdf"),
            path: None,
        };
        assert_eq!(resolve_display_name(&source), "escape.pdf");
    }

    #[test]
    fn local_file_source_reports_file_name() {
        let source = LocalFileSource::new("/tmp/library/notes.PDF");
        assert_eq!(source.display_name().as_deref(), Some("notes.PDF"));
    }
}
