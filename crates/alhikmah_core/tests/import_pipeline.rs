use alhikmah_core::{
    FileType, ImportError, ImportService, ImportSource, LibraryRepository, LocalFileSource,
    MetadataExtractor, SqliteLibraryRepository, Store,
};
use std::collections::BTreeMap;
use std::io::{self, Cursor, Read};
use std::path::Path;

struct MemorySource {
    name: Option<String>,
    path: Option<String>,
    bytes: Option<Vec<u8>>,
}

impl MemorySource {
    fn named(name: &str, bytes: &[u8]) -> Self {
        Self {
            name: Some(name.to_string()),
            path: None,
            bytes: Some(bytes.to_vec()),
        }
    }
}

impl ImportSource for MemorySource {
    fn display_name(&self) -> Option<String> {
        self.name.clone()
    }

    fn path_hint(&self) -> Option<String> {
        self.path.clone()
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        match &self.bytes {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            None => Err(io::Error::new(io::ErrorKind::PermissionDenied, "grant revoked")),
        }
    }
}

/// Opens fine, then fails on the first read.
struct BrokenStreamSource(&'static str);

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "provider hung up"))
    }
}

impl ImportSource for BrokenStreamSource {
    fn display_name(&self) -> Option<String> {
        Some(self.0.to_string())
    }

    fn path_hint(&self) -> Option<String> {
        None
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(BrokenReader))
    }
}

struct PagesExtractor(&'static str);

impl MetadataExtractor for PagesExtractor {
    fn extract(&self, _path: &Path, _file_type: FileType) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("title".to_string(), "Extracted Title".to_string()),
            ("author".to_string(), "Imam an-Nawawi".to_string()),
            ("pages".to_string(), self.0.to_string()),
        ])
    }
}

#[test]
fn upper_case_pdf_extension_is_classified_as_pdf() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let store = Store::open_in_memory().expect("in-memory store should open");
    let service = ImportService::new(SqliteLibraryRepository::new(&store), dir.path().join("books"));

    let book = service.import(&MemorySource::named("notes.PDF", b"%PDF-1.7")).unwrap();

    assert_eq!(book.file_type, FileType::Pdf);
    assert_eq!(book.title, "notes");
    assert_eq!(book.author, "Unknown");
    assert_eq!(book.total_pages, 0);
    assert_eq!(book.current_page, 0);
    assert!(book.id > 0);
}

#[test]
fn epub_and_unknown_extensions_are_classified() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let store = Store::open_in_memory().expect("in-memory store should open");
    let service = ImportService::new(SqliteLibraryRepository::new(&store), dir.path().join("books"));

    let epub = service.import(&MemorySource::named("story.epub", b"PK")).unwrap();
    let other = service.import(&MemorySource::named("scan.djvu", b"AT&T")).unwrap();

    assert_eq!(epub.file_type, FileType::Epub);
    assert_eq!(other.file_type, FileType::Unknown);
}

#[test]
fn import_copies_bytes_into_books_dir_and_registers_book() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let books_dir = dir.path().join("books");
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);
    let service = ImportService::new(repo, &books_dir);

    let book = service
        .import(&MemorySource::named("Tafsir.pdf", b"tafsir bytes"))
        .unwrap();

    let copy = books_dir.join("Tafsir.pdf");
    assert_eq!(std::fs::read(&copy).unwrap(), b"tafsir bytes");
    assert!(Path::new(&book.file_path).ends_with("books/Tafsir.pdf"));
    assert_eq!(repo.find_book(book.id).unwrap().unwrap(), book);
}

#[test]
fn failed_reimport_keeps_previous_copy_and_row() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let books_dir = dir.path().join("books");
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);
    let service = ImportService::new(repo, &books_dir);

    let first = service
        .import(&MemorySource::named("tafsir.pdf", b"complete tafsir"))
        .unwrap();

    let err = service
        .import(&BrokenStreamSource("tafsir.pdf"))
        .expect_err("broken stream must fail the import");

    assert!(matches!(err, ImportError::Copy { .. }));
    let books = repo.all_books().unwrap();
    assert_eq!(books, vec![first.clone()]);
    assert_eq!(std::fs::read(&first.file_path).unwrap(), b"complete tafsir");
    assert_eq!(std::fs::read_dir(&books_dir).unwrap().count(), 1);
}

#[test]
fn same_name_import_overwrites_copy() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let books_dir = dir.path().join("books");
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);
    let service = ImportService::new(repo, &books_dir);

    let first = service.import(&MemorySource::named("dup.pdf", b"old")).unwrap();
    let second = service.import(&MemorySource::named("dup.pdf", b"new")).unwrap();

    assert_eq!(first.file_path, second.file_path);
    assert_eq!(std::fs::read(books_dir.join("dup.pdf")).unwrap(), b"new");
    assert_eq!(repo.all_books().unwrap().len(), 2);
}

#[test]
fn display_name_falls_back_to_path_then_unknown() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let books_dir = dir.path().join("books");
    let store = Store::open_in_memory().expect("in-memory store should open");
    let service = ImportService::new(SqliteLibraryRepository::new(&store), &books_dir);

    let from_path = service
        .import(&MemorySource {
            name: None,
            path: Some("/document/primary:Download/kitab.epub".to_string()),
            bytes: Some(b"PK".to_vec()),
        })
        .unwrap();
    assert_eq!(from_path.file_type, FileType::Epub);
    assert_eq!(from_path.title, "kitab");
    assert!(books_dir.join("kitab.epub").exists());

    let unknown = service
        .import(&MemorySource {
            name: None,
            path: None,
            bytes: Some(b"??".to_vec()),
        })
        .unwrap();
    assert_eq!(unknown.file_type, FileType::Unknown);
    assert_eq!(unknown.title, "Unknown");
    assert!(books_dir.join("Unknown").exists());
}

#[test]
fn unavailable_source_fails_without_registering() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let books_dir = dir.path().join("books");
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);
    let service = ImportService::new(repo, &books_dir);

    let err = service
        .import(&MemorySource {
            name: Some("revoked.pdf".to_string()),
            path: None,
            bytes: None,
        })
        .expect_err("unreadable source must fail the import");

    assert!(matches!(err, ImportError::SourceUnavailable { .. }));
    assert!(repo.all_books().unwrap().is_empty());
    assert!(!books_dir.join("revoked.pdf").exists());
}

#[test]
fn metadata_pages_are_parsed_with_zero_fallback() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);

    let counted = ImportService::with_extractor(repo, dir.path(), PagesExtractor("120"))
        .import(&MemorySource::named("a.pdf", b"x"))
        .unwrap();
    assert_eq!(counted.total_pages, 120);
    assert_eq!(counted.title, "Extracted Title");
    assert_eq!(counted.author, "Imam an-Nawawi");

    let garbled = ImportService::with_extractor(repo, dir.path(), PagesExtractor("many"))
        .import(&MemorySource::named("b.pdf", b"x"))
        .unwrap();
    assert_eq!(garbled.total_pages, 0);
}

#[test]
fn local_file_source_imports_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let original = dir.path().join("Downloads").join("Arbain.pdf");
    std::fs::create_dir_all(original.parent().unwrap()).unwrap();
    std::fs::write(&original, b"%PDF arbain").unwrap();

    let store = Store::open_in_memory().expect("in-memory store should open");
    let service = ImportService::new(SqliteLibraryRepository::new(&store), dir.path().join("books"));
    let book = service.import(&LocalFileSource::new(&original)).unwrap();

    std::fs::remove_file(&original).unwrap();
    assert_eq!(std::fs::read(&book.file_path).unwrap(), b"%PDF arbain");
    assert_eq!(book.title, "Arbain");
}
