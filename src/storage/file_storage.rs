//! Flat-file table storage
//!
//! One file per table at `<data_dir>/<database>/<table>`. Files are opened
//! read-only by the query path; `append_row` is the only writer.

use super::{chunk_from_overread, RowChunk, TableStorage};
use crate::config::DBConfig;
use crate::{Result, StorageError};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Open table file
pub struct FileHandle {
    file: File,
    path: PathBuf,
}

impl FileHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file length in bytes
    pub fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}

/// Table storage backed by one flat file per table
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Tables are looked up directly under `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Storage rooted at `<data_dir>/<database>`
    pub fn from_config(config: &DBConfig) -> Self {
        Self::new(config.database_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table_path(&self, table: &str) -> Result<PathBuf> {
        if table.is_empty()
            || table.contains(['/', '\\'])
            || table == "."
            || table == ".."
        {
            return Err(StorageError::InvalidArgument(format!(
                "invalid table file name: '{}'",
                table
            )));
        }
        Ok(self.root.join(table))
    }

    /// Append one encoded row to the table file, creating it if needed
    pub fn append_row(&self, table: &str, row: &[u8]) -> Result<()> {
        let path = self.table_path(table)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(row)?;
        file.flush()?;

        trace!(table, bytes = row.len(), "appended row");
        Ok(())
    }
}

impl TableStorage for FileStorage {
    type Handle = FileHandle;

    fn open(&self, table: &str) -> Result<FileHandle> {
        let path = self.table_path(table)?;
        let file = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::FileNotFound(path.clone()),
            _ => StorageError::Io(e),
        })?;

        debug!(path = %path.display(), "opened table file");
        Ok(FileHandle { file, path })
    }

    fn read_chunk(&self, handle: &mut FileHandle, offset: u64, max_size: usize) -> Result<RowChunk> {
        let remaining = handle.len()?.saturating_sub(offset);
        handle.file.seek(SeekFrom::Start(offset))?;

        let limit = (max_size as u64).saturating_add(1);
        let capacity = usize::try_from(remaining.min(limit)).unwrap_or(0);
        let mut data = Vec::with_capacity(capacity);
        (&mut handle.file).take(limit).read_to_end(&mut data)?;

        let chunk = chunk_from_overread(offset, data, max_size);
        trace!(
            path = %handle.path.display(),
            offset,
            valid_bytes = chunk.valid_bytes,
            truncated = chunk.is_truncated(),
            "read chunk"
        );
        Ok(chunk)
    }

    fn close(&self, handle: FileHandle) -> Result<()> {
        debug!(path = %handle.path.display(), "closed table file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let result = storage.open("Ghost");
        assert!(matches!(result, Err(StorageError::FileNotFound(p)) if p.ends_with("Ghost")));
    }

    #[test]
    fn test_append_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("db"));

        storage.append_row("User", &[1, 0, 0, 0, 20, 0, 0, 0]).unwrap();
        storage.append_row("User", &[2, 0, 0, 0, 24, 0, 0, 0]).unwrap();

        let mut handle = storage.open("User").unwrap();
        assert_eq!(handle.len().unwrap(), 16);

        let chunk = storage.read_chunk(&mut handle, 0, 1024).unwrap();
        assert_eq!(chunk.valid_bytes, 16);
        assert_eq!(chunk.whole_rows(8), 2);
        assert!(!chunk.is_truncated());

        let tail = storage.read_chunk(&mut handle, 8, 1024).unwrap();
        assert_eq!(tail.data, vec![2, 0, 0, 0, 24, 0, 0, 0]);

        storage.close(handle).unwrap();
    }

    #[test]
    fn test_chunk_exactly_at_end_is_not_truncated() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.append_row("T", &[0u8; 16]).unwrap();

        let mut handle = storage.open("T").unwrap();
        let exact = storage.read_chunk(&mut handle, 0, 16).unwrap();
        assert_eq!(exact.valid_bytes, 16);
        assert_eq!(exact.next_offset, None);

        let short = storage.read_chunk(&mut handle, 0, 8).unwrap();
        assert_eq!(short.valid_bytes, 8);
        assert_eq!(short.next_offset, Some(8));
    }

    #[test]
    fn test_unbounded_chunk_reads_only_file_contents() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.append_row("User", &[7, 0, 0, 0, 30, 0, 0, 0]).unwrap();

        let mut handle = storage.open("User").unwrap();
        let chunk = storage.read_chunk(&mut handle, 0, usize::MAX).unwrap();
        assert_eq!(chunk.valid_bytes, 8);
        assert!(!chunk.is_truncated());

        let past_end = storage.read_chunk(&mut handle, 64, usize::MAX).unwrap();
        assert_eq!(past_end.valid_bytes, 0);
    }

    #[test]
    fn test_rejects_path_like_table_names() {
        let storage = FileStorage::new("/tmp");
        for name in ["", "..", "../etc", "a/b"] {
            assert!(matches!(
                storage.table_path(name),
                Err(StorageError::InvalidArgument(_))
            ));
        }
    }
}
