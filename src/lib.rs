//! flatql query core
//!
//! A small SQL-subset interpreter over fixed-width flat-file tables.
//!
//! ## Architecture
//! - SQL layer: statement splitter + tokenizer + SELECT parser + WHERE parser
//! - Catalog: table name -> ordered, fixed-width column layout
//! - Storage: one append-only file per table, read in bounded chunks
//! - Executor: projection and single-predicate filtering over decoded rows

pub mod config;
pub mod types;
pub mod catalog;
pub mod storage;
pub mod sql;

mod error;
mod api;

pub use config::DBConfig;
pub use error::{ParseError, Result, StorageError};

pub use api::Database;
pub use catalog::{SchemaCatalog, TableRegistry};
pub use sql::{parse, QueryExecutor, SelectResult, Statement};
pub use storage::{FileStorage, MemoryStorage, RowChunk, TableStorage};
pub use types::{ColumnDef, FieldType, RowRecord, TableSchema, Value};
