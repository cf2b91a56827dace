//! In-memory storage port for tests and ephemeral sessions.

use super::{StoragePort, StorageResult};
use std::collections::HashMap;

/// HashMap-backed storage port. Contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    cells: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemoryStorage {
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.cells.get(key).cloned())
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        self.cells.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
