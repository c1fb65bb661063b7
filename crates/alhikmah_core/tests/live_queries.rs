use alhikmah_core::{Book, FileType, LibraryRepository, SqliteLibraryRepository, Store};

fn sample_book(title: &str, last_read_time: i64) -> Book {
    Book::new(
        title,
        format!("/data/books/{title}.pdf"),
        FileType::Pdf,
        last_read_time,
    )
}

#[test]
fn all_books_query_refreshes_after_insert() {
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);
    let mut books = repo.list_all_books();

    assert!(books.current().unwrap().is_empty());
    assert!(!books.has_changed());
    assert!(books.poll().unwrap().is_none());

    repo.add_book(&sample_book("Fiqh", 1)).unwrap();

    assert!(books.has_changed());
    let refreshed = books.poll().unwrap().unwrap();
    assert_eq!(refreshed.len(), 1);
    assert!(!books.has_changed());
}

#[test]
fn reading_progress_updates_reorder_the_list() {
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);
    let first = repo.add_book(&sample_book("first", 1_000)).unwrap();
    let second = repo.add_book(&sample_book("second", 2_000)).unwrap();

    let mut books = repo.list_all_books();
    let ids: Vec<_> = books.current().unwrap().iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![second, first]);

    repo.update_reading_progress_at(first, 4, 5_000).unwrap();
    let ids: Vec<_> = books
        .poll()
        .unwrap()
        .unwrap()
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn favorites_query_follows_flag_changes() {
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);
    let mut book = sample_book("Shamail", 1);
    book.id = repo.add_book(&book).unwrap();

    let mut favorites = repo.list_favorites();
    assert!(favorites.current().unwrap().is_empty());

    book.is_favorite = true;
    repo.update_book(&book).unwrap();
    assert_eq!(favorites.poll().unwrap().unwrap().len(), 1);
}

#[test]
fn book_query_turns_empty_after_delete() {
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);
    let mut book = sample_book("Nawawi", 1);
    book.id = repo.add_book(&book).unwrap();

    let mut detail = repo.get_book(book.id);
    assert_eq!(detail.current().unwrap().unwrap().title, "Nawawi");

    repo.delete_book(&book).unwrap();
    assert!(detail.poll().unwrap().unwrap().is_none());
}

#[test]
fn history_query_ignores_book_writes() {
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);
    let id = repo.add_book(&sample_book("Tirmidhi", 1)).unwrap();

    let mut history = repo.get_reading_history(id);
    assert!(history.current().unwrap().is_empty());

    repo.update_reading_progress_at(id, 5, 10).unwrap();
    assert!(!history.has_changed());

    repo.save_reading_session(id, 10, 5.0, 0).unwrap();
    assert!(history.has_changed());
    assert_eq!(history.current().unwrap().len(), 1);
}

#[test]
fn dropping_a_query_does_not_affect_others() {
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);

    let mut kept = repo.list_all_books();
    kept.current().unwrap();
    drop(repo.list_all_books());

    repo.add_book(&sample_book("Kept", 1)).unwrap();
    assert_eq!(kept.poll().unwrap().unwrap().len(), 1);
}

#[tokio::test]
async fn next_resolves_after_pending_write() {
    let store = Store::open_in_memory().expect("in-memory store should open");
    let repo = SqliteLibraryRepository::new(&store);
    let mut books = repo.list_all_books();
    books.current().unwrap();

    repo.add_book(&sample_book("Awaited", 1)).unwrap();

    let refreshed = books.next().await.unwrap();
    assert_eq!(refreshed.len(), 1);
    assert_eq!(refreshed[0].title, "Awaited");
}
