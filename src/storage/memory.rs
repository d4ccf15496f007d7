/// In-memory table storage, for embedding and tests
use super::{chunk_from_overread, RowChunk, TableStorage};
use crate::{Result, StorageError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Snapshot of one table's bytes taken at open time
pub struct MemoryHandle {
    bytes: Arc<Vec<u8>>,
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<HashMap<String, Arc<Vec<u8>>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a table's contents
    pub fn put(&self, table: &str, bytes: Vec<u8>) {
        self.tables.write().insert(table.to_string(), Arc::new(bytes));
    }

    /// Append raw row bytes to a table, creating it if needed
    pub fn append_row(&self, table: &str, row: &[u8]) {
        let mut tables = self.tables.write();
        let entry = tables.entry(table.to_string()).or_default();
        Arc::make_mut(entry).extend_from_slice(row);
    }
}

impl TableStorage for MemoryStorage {
    type Handle = MemoryHandle;

    fn open(&self, table: &str) -> Result<MemoryHandle> {
        self.tables
            .read()
            .get(table)
            .cloned()
            .map(|bytes| MemoryHandle { bytes })
            .ok_or_else(|| StorageError::FileNotFound(PathBuf::from(table)))
    }

    fn read_chunk(&self, handle: &mut MemoryHandle, offset: u64, max_size: usize) -> Result<RowChunk> {
        let start = usize::try_from(offset)
            .unwrap_or(usize::MAX)
            .min(handle.bytes.len());
        let end = start
            .saturating_add(max_size)
            .saturating_add(1)
            .min(handle.bytes.len());

        Ok(chunk_from_overread(offset, handle.bytes[start..end].to_vec(), max_size))
    }
}
