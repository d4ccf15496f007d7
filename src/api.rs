//! Database handle wiring config, catalog and file storage together

use crate::catalog::{SchemaCatalog, TableRegistry};
use crate::config::DBConfig;
use crate::error::Result;
use crate::sql::{QueryExecutor, SelectResult};
use crate::storage::{codec, FileStorage};
use crate::types::{TableSchema, Value};
use std::sync::Arc;
use tracing::info;

/// A flat-file database: one directory of table files plus its catalog
///
/// # Example
/// ```ignore
/// let db = Database::open(DBConfig::new().with_data_dir("./databases"))?;
/// for row in db.query("select * from User where id = 1")?.rows {
///     println!("{:?}", row);
/// }
/// ```
pub struct Database {
    config: DBConfig,
    executor: QueryExecutor<Arc<TableRegistry>, FileStorage>,
}

impl Database {
    /// Open with the catalog named in `config`, or the built-in one
    pub fn open(config: DBConfig) -> Result<Self> {
        config.validate()?;

        let registry = match &config.catalog_path {
            Some(path) => TableRegistry::from_json_file(path)?,
            None => TableRegistry::builtin(),
        };

        Ok(Self::with_catalog(config, Arc::new(registry)))
    }

    /// Open with an already built catalog
    pub fn with_catalog(config: DBConfig, catalog: Arc<TableRegistry>) -> Self {
        let storage = FileStorage::from_config(&config);
        info!(
            root = %storage.root().display(),
            tables = catalog.len(),
            chunk_size = config.chunk_size,
            "database opened"
        );

        let executor = QueryExecutor::new(catalog, storage).with_chunk_size(config.chunk_size);
        Self { config, executor }
    }

    pub fn config(&self) -> &DBConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TableRegistry {
        self.executor.catalog()
    }

    /// Run every statement in `sql`
    pub fn execute(&self, sql: &str) -> Result<Vec<SelectResult>> {
        self.executor.execute_sql(sql)
    }

    /// Run `sql` and return the last statement's result (empty if there was none)
    pub fn query(&self, sql: &str) -> Result<SelectResult> {
        Ok(self.execute(sql)?.pop().unwrap_or_default())
    }

    pub fn schema(&self, table: &str) -> Result<Arc<TableSchema>> {
        self.catalog().resolve(table)
    }

    /// Encode and append one row to a table's file
    pub fn append(&self, table: &str, values: &[(&str, Value)]) -> Result<()> {
        let schema = self.schema(table)?;
        let row = codec::encode_row(&schema, values)?;
        self.executor.storage().append_row(table, &row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;

    #[test]
    fn test_open_append_query() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Database::open(DBConfig::new().with_data_dir(temp_dir.path())).unwrap();

        db.append("User", &[("id", Value::Integer(2)), ("age", Value::Integer(24))]).unwrap();
        db.append("User", &[("id", Value::Integer(2)), ("age", Value::Integer(24))]).unwrap();
        db.append("User", &[("id", Value::Integer(2)), ("age", Value::Integer(32))]).unwrap();
        assert!(temp_dir.path().join("default").join("User").exists());

        let result = db.query("select * from User;").unwrap();
        assert_eq!(
            result.value_rows(),
            vec![
                vec![Value::Integer(2), Value::Integer(24)],
                vec![Value::Integer(2), Value::Integer(24)],
                vec![Value::Integer(2), Value::Integer(32)],
            ]
        );

        let result = db.query("select age from User where age > 24").unwrap();
        assert_eq!(result.value_rows(), vec![vec![Value::Integer(32)]]);
    }

    #[test]
    fn test_open_with_catalog_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = temp_dir.path().join("catalog.json");
        std::fs::write(
            &catalog,
            r#"{"tables":[{"name":"Tag","columns":[{"name":"label","type":"Char(4)"}]}]}"#,
        )
        .unwrap();

        let db = Database::open(
            DBConfig::new()
                .with_data_dir(temp_dir.path())
                .with_database("tags")
                .with_catalog_path(&catalog),
        )
        .unwrap();
        db.append("Tag", &[("label", Value::from("rustacean"))]).unwrap();

        let result = db.query("select label from Tag;").unwrap();
        assert_eq!(result.value_rows(), vec![vec![Value::from("rust")]]);
        assert!(matches!(db.schema("User"), Err(StorageError::UnknownTable(_))));
    }

    #[test]
    fn test_query_missing_table_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Database::open(DBConfig::new().with_data_dir(temp_dir.path())).unwrap();
        assert!(matches!(
            db.query("select * from User;"),
            Err(StorageError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_empty_script() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Database::open(DBConfig::new().with_data_dir(temp_dir.path())).unwrap();
        assert_eq!(db.query("\n").unwrap().row_count(), 0);
    }
}
