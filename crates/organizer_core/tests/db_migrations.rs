use organizer_core::db::migrations::latest_version;
use organizer_core::db::{open_db, open_db_in_memory, DbError};
use organizer_core::{MetaRepository, Store};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ["meta", "people", "tasks", "appointments", "cash", "documents"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn schema_declares_secondary_indexes() {
    let conn = open_db_in_memory().unwrap();

    for index in [
        "people_by_name",
        "tasks_by_date",
        "tasks_by_bucket_date",
        "tasks_by_person",
        "appointments_by_date",
        "appointments_by_person",
        "cash_by_date",
        "cash_by_person",
        "documents_by_date",
        "documents_by_person",
        "documents_by_related",
    ] {
        assert_index_exists(&conn, index);
    }
}

#[test]
fn creation_time_is_seeded_once_per_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("organizer.sqlite3");

    let first = {
        let mut store = Store::open(&path).unwrap();
        store.meta().database_created_at().unwrap()
    };
    let first = first.expect("createdAt should be seeded by the first migration");
    assert!(first.ends_with('Z'));

    let mut reopened = Store::open(&path).unwrap();
    assert_eq!(
        reopened.meta().database_created_at().unwrap().as_deref(),
        Some(first.as_str())
    );
    assert!(reopened.meta().get_meta("createdAt").unwrap().is_some());
}

#[test]
fn opening_same_database_twice_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("organizer.sqlite3");

    {
        let mut store = Store::open(&path).unwrap();
        store
            .meta()
            .set_meta("theme", &serde_json::json!("dark"))
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    drop(conn);

    let mut store = Store::open(&path).unwrap();
    assert_eq!(
        store.meta().get_meta("theme").unwrap(),
        Some(serde_json::json!("dark"))
    );
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
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

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
