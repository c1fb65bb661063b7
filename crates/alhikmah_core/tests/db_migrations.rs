use alhikmah_core::db::migrations::latest_version;
use alhikmah_core::db::{open_db, open_db_in_memory, open_db_with_policy, DbError, MigrationPolicy};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().expect("in-memory db should open");

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "books");
    assert_table_exists(&conn, "reading_progress");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("alhikmah.sqlite3");

    let conn_first = open_db(&path).unwrap();
    insert_book(&conn_first);
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(count_rows(&conn_second, "books"), 1);
}

#[test]
fn strict_policy_rejects_newer_schema_version() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).expect_err("newer schema must be rejected");
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn destructive_fallback_rebuilds_schema_and_drops_data() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("future.sqlite3");

    let conn = open_db(&path).unwrap();
    insert_book(&conn);
    conn.execute_batch("CREATE TABLE legacy_shelves (id INTEGER PRIMARY KEY);")
        .unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    let conn = open_db_with_policy(&path, MigrationPolicy::DestructiveFallback).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "books");
    assert_table_exists(&conn, "reading_progress");
    assert_eq!(count_rows(&conn, "books"), 0);

    let legacy: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE name = 'legacy_shelves';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(legacy, 0);
}

#[test]
fn progress_rows_have_no_foreign_key_to_books() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    conn.execute(
        "INSERT INTO reading_progress (book_id, timestamp, page_number, percentage)
         VALUES (12345, 1, 0, 0.0);",
        [],
    )
    .unwrap();
    assert_eq!(count_rows(&conn, "reading_progress"), 1);
}

fn insert_book(conn: &Connection) {
    conn.execute(
        "INSERT INTO books (title, file_path, file_type, last_read_time, added_time)
         VALUES ('Bulugh al-Maram', '/data/books/bulugh.pdf', 'PDF', 1, 1);",
        [],
    )
    .unwrap();
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
