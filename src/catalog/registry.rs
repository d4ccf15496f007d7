/// Table registry holding table schemas
use super::SchemaCatalog;
use crate::error::{Result, StorageError};
use crate::types::{ColumnDef, FieldType, TableSchema};
use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// On-disk catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    tables: Vec<TableSchema>,
}

/// Catalog of table schemas
///
/// Built once at startup (from code or a JSON file) and injected into the
/// executor.
#[derive(Default)]
pub struct TableRegistry {
    tables: RwLock<AHashMap<String, Arc<TableSchema>>>,
}

impl TableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the single built-in table `User (id Int, age Int)`
    pub fn builtin() -> Self {
        let user = TableSchema::layout(
            "User".to_string(),
            vec![
                ColumnDef::new("id", FieldType::Int),
                ColumnDef::new("age", FieldType::Int),
            ],
        );

        let mut tables = AHashMap::new();
        tables.insert(user.name.clone(), Arc::new(user));
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Load from `{"tables": [{"name": .., "columns": [{"name": .., "type": "Char(10)"}]}]}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let registry = Self::new();
        for schema in file.tables {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::FileNotFound(path.to_path_buf()),
            _ => StorageError::Io(e),
        })?;

        let registry = Self::from_json_str(&json)?;
        debug!(path = %path.display(), tables = registry.len(), "loaded catalog");
        Ok(registry)
    }

    /// Serialize all tables back to the JSON catalog format
    pub fn to_json(&self) -> Result<String> {
        let mut tables: Vec<TableSchema> = self
            .tables
            .read()
            .values()
            .map(|schema| (**schema).clone())
            .collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(serde_json::to_string_pretty(&CatalogFile { tables })?)
    }

    /// Register a table. Names are case-sensitive and must be unique.
    pub fn register(&self, schema: TableSchema) -> Result<Arc<TableSchema>> {
        let mut tables = self.tables.write();

        if tables.contains_key(&schema.name) {
            return Err(StorageError::InvalidArgument(format!(
                "Table '{}' already exists",
                schema.name
            )));
        }

        let schema = Arc::new(schema);
        tables.insert(schema.name.clone(), schema.clone());
        Ok(schema)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.read().contains_key(table)
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}

impl SchemaCatalog for TableRegistry {
    fn resolve(&self, table: &str) -> Result<Arc<TableSchema>> {
        self.tables
            .read()
            .get(table)
            .cloned()
            .ok_or_else(|| StorageError::UnknownTable(table.to_string()))
    }

    fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }
}
