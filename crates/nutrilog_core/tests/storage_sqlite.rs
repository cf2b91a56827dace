use nutrilog_core::storage::migrations::latest_version;
use nutrilog_core::{SqliteStorage, StorageError, StoragePort};
use rusqlite::Connection;

#[test]
fn open_in_memory_applies_all_migrations() {
    let storage = SqliteStorage::open_in_memory().unwrap();

    assert_eq!(schema_version(storage.connection()), latest_version());
    assert_table_exists(storage.connection(), "kv_cells");
}

#[test]
fn save_then_load_round_trips_and_overwrites() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();

    assert_eq!(storage.load("food_items").unwrap(), None);

    storage.save("food_items", b"[1]").unwrap();
    assert_eq!(storage.load("food_items").unwrap().unwrap(), b"[1]");

    storage.save("food_items", b"[1,2]").unwrap();
    assert_eq!(storage.load("food_items").unwrap().unwrap(), b"[1,2]");
}

#[test]
fn distinct_keys_do_not_interfere() {
    let mut storage = SqliteStorage::open_in_memory().unwrap();

    storage.save("food_items", b"catalog").unwrap();
    storage.save("meal_logs", b"log").unwrap();

    assert_eq!(storage.load("food_items").unwrap().unwrap(), b"catalog");
    assert_eq!(storage.load("meal_logs").unwrap().unwrap(), b"log");
}

#[test]
fn reopening_same_database_is_idempotent_and_durable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nutrilog.db");

    let mut first = SqliteStorage::open(&path).unwrap();
    assert_eq!(schema_version(first.connection()), latest_version());
    first.save("food_items", b"persisted").unwrap();
    drop(first);

    let second = SqliteStorage::open(&path).unwrap();
    assert_eq!(schema_version(second.connection()), latest_version());
    assert_eq!(second.load("food_items").unwrap().unwrap(), b"persisted");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = SqliteStorage::open(&path).unwrap_err();
    match err {
        StorageError::UnsupportedSchemaVersion {
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
