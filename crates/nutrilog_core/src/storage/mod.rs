//! Storage ports for durable key-value persistence.
//!
//! # Responsibility
//! - Define the byte-oriented load/save contract stores persist through.
//! - Keep backend details (SQLite, in-memory) out of store logic.
//!
//! # Invariants
//! - `save` replaces the whole value under a key; there are no partial writes.
//! - `load` of an absent key is `Ok(None)`, never an error.
//! - Each store owns exactly one key and never shares it with another store.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod migrations;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by storage port implementations.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "storage schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Backend(message) => write!(f, "{message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::Backend(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Byte-oriented key-value port the stores persist through.
///
/// Implementations replace whole values atomically from the caller's point
/// of view; stores serialize their full collection on every write.
pub trait StoragePort {
    /// Loads the stored bytes for `key`, or `None` when the key is absent.
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the stored bytes for `key`.
    fn save(&mut self, key: &str, bytes: &[u8]) -> StorageResult<()>;
}
