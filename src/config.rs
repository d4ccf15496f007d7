//! Database configuration
//!
//! Where table files live, how much of a table one query reads, and where
//! the catalog comes from.

use crate::error::{Result, StorageError};
use crate::storage::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DBConfig {
    /// Root directory holding one sub-directory per database
    pub data_dir: PathBuf,

    /// Database name; table files live in `data_dir/database/`
    pub database: String,

    /// Maximum bytes a single SELECT reads from a table file (default: 32 KiB, at most 1 GiB)
    ///
    /// Tables larger than this return only the rows of the first chunk;
    /// such results are flagged as truncated.
    pub chunk_size: usize,

    /// JSON catalog file. `None` means the built-in `User` table.
    pub catalog_path: Option<PathBuf>,
}

impl Default for DBConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./databases"),
            database: "default".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            catalog_path: None,
        }
    }
}

impl DBConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir<P: AsRef<Path>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_catalog_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.catalog_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::FileNotFound(path.to_path_buf()),
            _ => StorageError::Io(e),
        })?;
        let config: DBConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(StorageError::InvalidArgument(format!(
                "chunk_size must be between 1 and {} bytes, got {}",
                MAX_CHUNK_SIZE, self.chunk_size
            )));
        }
        if self.database.is_empty() || self.database.contains(['/', '\\']) {
            return Err(StorageError::InvalidArgument(format!(
                "invalid database name: '{}'",
                self.database
            )));
        }
        Ok(())
    }

    /// Directory holding this database's table files
    pub fn database_dir(&self) -> PathBuf {
        self.data_dir.join(&self.database)
    }

    /// Path of a table's storage file
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.database_dir().join(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DBConfig::default();
        assert_eq!(config.chunk_size, 32768);
        assert_eq!(config.table_path("User"), PathBuf::from("./databases/default/User"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = DBConfig::new()
            .with_data_dir("/data")
            .with_database("test")
            .with_chunk_size(64)
            .with_catalog_path("/etc/catalog.json");
        assert_eq!(config.database_dir(), PathBuf::from("/data/test"));
        assert_eq!(config.chunk_size, 64);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/etc/catalog.json")));
    }

    #[test]
    fn test_validate() {
        assert!(DBConfig::new().with_chunk_size(0).validate().is_err());
        assert!(DBConfig::new().with_chunk_size(MAX_CHUNK_SIZE).validate().is_ok());
        assert!(DBConfig::new().with_chunk_size(MAX_CHUNK_SIZE + 1).validate().is_err());
        assert!(DBConfig::new().with_chunk_size(1 << 45).validate().is_err());
        assert!(DBConfig::new().with_database("").validate().is_err());
        assert!(DBConfig::new().with_database("../x").validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"database": "test", "chunk_size": 16}"#).unwrap();

        let config = DBConfig::from_json_file(&path).unwrap();
        assert_eq!(config.database, "test");
        assert_eq!(config.chunk_size, 16);
        assert_eq!(config.data_dir, PathBuf::from("./databases"));
    }

    #[test]
    fn test_invalid_json_chunk_size() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"chunk_size": 0}"#).unwrap();
        assert!(matches!(
            DBConfig::from_json_file(&path),
            Err(StorageError::InvalidArgument(_))
        ));
    }
}
