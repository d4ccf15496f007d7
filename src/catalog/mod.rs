//! Schema catalog: resolves table names to their fixed-width layouts

mod registry;

pub use registry::TableRegistry;

use crate::error::Result;
use crate::types::TableSchema;
use std::sync::Arc;

/// Lookup contract consumed by the executor before any storage access.
///
/// Schemas are shared, never copied per query.
pub trait SchemaCatalog {
    /// Resolve a table, failing with `StorageError::UnknownTable`
    fn resolve(&self, table: &str) -> Result<Arc<TableSchema>>;

    /// Names of all known tables, sorted
    fn list_tables(&self) -> Vec<String>;
}

impl<C: SchemaCatalog + ?Sized> SchemaCatalog for Arc<C> {
    fn resolve(&self, table: &str) -> Result<Arc<TableSchema>> {
        (**self).resolve(table)
    }

    fn list_tables(&self) -> Vec<String> {
        (**self).list_tables()
    }
}
