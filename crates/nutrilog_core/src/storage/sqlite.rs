//! SQLite-backed storage port.
//!
//! # Responsibility
//! - Provide the durable key-value medium for catalog and log snapshots.
//! - Configure connections and apply schema migrations before first use.
//!
//! # Invariants
//! - Returned handles have migrations fully applied.
//! - One `kv_cells` row per key; `save` upserts the whole value.

use super::migrations::apply_migrations;
use super::{StoragePort, StorageResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// Storage port persisting key-value cells in a SQLite database.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens a database file and applies all pending migrations.
    ///
    /// # Side effects
    /// - Emits `storage_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let started_at = Instant::now();
        info!("event=storage_open module=storage status=start mode=file");

        let conn = match Connection::open(path) {
            Ok(conn) => conn,
            Err(err) => {
                log_open_error("file", started_at, "storage_open_failed", &err);
                return Err(err.into());
            }
        };

        Self::bootstrap(conn, "file", started_at)
    }

    /// Opens an in-memory database and applies all pending migrations.
    ///
    /// # Side effects
    /// - Emits `storage_open` logging events with duration and status.
    pub fn open_in_memory() -> StorageResult<Self> {
        let started_at = Instant::now();
        info!("event=storage_open module=storage status=start mode=memory");

        let conn = match Connection::open_in_memory() {
            Ok(conn) => conn,
            Err(err) => {
                log_open_error("memory", started_at, "storage_open_failed", &err);
                return Err(err.into());
            }
        };

        Self::bootstrap(conn, "memory", started_at)
    }

    fn bootstrap(
        mut conn: Connection,
        mode: &str,
        started_at: Instant,
    ) -> StorageResult<Self> {
        let result = conn
            .busy_timeout(Duration::from_secs(5))
            .map_err(Into::into)
            .and_then(|()| apply_migrations(&mut conn));

        match result {
            Ok(()) => {
                info!(
                    "event=storage_open module=storage status=ok mode={mode} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self { conn })
            }
            Err(err) => {
                log_open_error(mode, started_at, "storage_bootstrap_failed", &err);
                Err(err)
            }
        }
    }

    /// Borrows the underlying connection, for schema inspection in tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StoragePort for SqliteStorage {
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_cells WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_cells (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, bytes],
        )?;
        Ok(())
    }
}

fn log_open_error(
    mode: &str,
    started_at: Instant,
    error_code: &str,
    err: &dyn std::fmt::Display,
) {
    error!(
        "event=storage_open module=storage status=error mode={mode} duration_ms={} error_code={error_code} error={err}",
        started_at.elapsed().as_millis()
    );
}
