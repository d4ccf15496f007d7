//! Table storage: the chunked read capability and the fixed-width row codec
//!
//! Every table lives in one append-only file of fixed-width rows with no
//! header and no row delimiter. Readers pull bounded chunks of raw bytes and
//! decode only the whole rows inside them.

pub mod codec;
mod file_storage;
mod memory;

pub use file_storage::{FileHandle, FileStorage};
pub use memory::{MemoryHandle, MemoryStorage};

use crate::error::Result;

/// Default chunk size for a single read (32 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Largest chunk size a query may be configured with (1 GiB)
pub const MAX_CHUNK_SIZE: usize = 1 << 30;

/// One bounded read of raw table bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowChunk {
    /// Byte offset in the table file the chunk starts at
    pub offset: u64,
    /// Bytes read; only `valid_bytes` of them are meaningful
    pub data: Vec<u8>,
    pub valid_bytes: usize,
    /// Offset of the first byte past this chunk, when the table holds more
    pub next_offset: Option<u64>,
}

impl RowChunk {
    /// Number of whole rows in the chunk. A trailing partial row is not counted.
    pub fn whole_rows(&self, row_byte_size: u32) -> usize {
        if row_byte_size == 0 {
            return 0;
        }
        self.valid_bytes / row_byte_size as usize
    }

    /// Bytes of the `index`th whole row
    pub fn row(&self, index: usize, row_byte_size: u32) -> Option<&[u8]> {
        let size = row_byte_size as usize;
        let start = index.checked_mul(size)?;
        let end = start.checked_add(size)?;
        if size == 0 || end > self.valid_bytes {
            return None;
        }
        self.data.get(start..end)
    }

    /// More data may exist beyond this chunk
    pub fn is_truncated(&self) -> bool {
        self.next_offset.is_some()
    }
}

/// Read capability over table files
///
/// `read_chunk` over-reads by one byte so a chunk that exactly fills
/// `max_size` can be told apart from one that ends the table:
/// `next_offset` is set only when at least one more byte exists.
pub trait TableStorage {
    type Handle;

    /// Open the storage file backing `table`
    fn open(&self, table: &str) -> Result<Self::Handle>;

    /// Read at most `max_size` bytes starting at `offset`.
    /// Any `max_size` is accepted; the buffer never grows past what the table holds.
    fn read_chunk(&self, handle: &mut Self::Handle, offset: u64, max_size: usize) -> Result<RowChunk>;

    /// Release the handle. Dropping it has the same effect.
    fn close(&self, handle: Self::Handle) -> Result<()> {
        drop(handle);
        Ok(())
    }
}

/// Build a chunk from a buffer that was filled with up to `max_size + 1` bytes
pub(crate) fn chunk_from_overread(offset: u64, mut data: Vec<u8>, max_size: usize) -> RowChunk {
    let next_offset = if data.len() > max_size {
        data.truncate(max_size);
        Some(offset.saturating_add(max_size as u64))
    } else {
        None
    };

    RowChunk {
        offset,
        valid_bytes: data.len(),
        data,
        next_offset,
    }
}
