/// Query executor - runs SELECT statements against chunked table storage
use super::ast::*;
use super::parse;
use crate::catalog::SchemaCatalog;
use crate::error::{Result, StorageError};
use crate::storage::{codec, RowChunk, TableStorage, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use crate::types::{FieldType, RowRecord, TableSchema, Value};
use tracing::{debug, trace, warn};

/// Rows returned by a SELECT
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectResult {
    /// Projected column names, in output order
    pub columns: Vec<String>,
    /// Surviving rows in on-disk order
    pub rows: Vec<RowRecord>,
    /// The table holds bytes past the single chunk that was read, so rows may be missing
    pub truncated: bool,
    /// Byte offset of the first row not decoded, when `truncated`
    pub resume_offset: Option<u64>,
}

impl SelectResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows as plain value vectors, parallel to `columns`
    pub fn value_rows(&self) -> Vec<Vec<Value>> {
        self.rows
            .iter()
            .map(|row| row.values().cloned().collect())
            .collect()
    }
}

/// A column resolved to its type and byte offset
#[derive(Debug, Clone)]
struct BoundColumn {
    name: String,
    field_type: FieldType,
    offset: u32,
}

/// Everything checked before storage is touched
struct ScanPlan<'a> {
    projection: Vec<BoundColumn>,
    filter: Option<(&'a WhereClause, BoundColumn)>,
    row_byte_size: u32,
}

/// Executes statements using an injected catalog and storage backend.
///
/// Each SELECT reads at most one chunk of `chunk_size` bytes from the start
/// of the table file. Larger tables come back flagged `truncated`.
pub struct QueryExecutor<C, S> {
    catalog: C,
    storage: S,
    chunk_size: usize,
}

impl<C: SchemaCatalog, S: TableStorage> QueryExecutor<C, S> {
    pub fn new(catalog: C, storage: S) -> Self {
        Self {
            catalog,
            storage,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Parse and run every non-blank statement of `sql`, stopping at the first error
    pub fn execute_sql(&self, sql: &str) -> Result<Vec<SelectResult>> {
        parse(sql)?
            .iter()
            .map(|statement| self.execute(statement))
            .collect()
    }

    pub fn execute(&self, statement: &Statement) -> Result<SelectResult> {
        match statement {
            Statement::Select(select) => self.select(select),
            Statement::Unsupported(kind) => Err(StorageError::UnsupportedCommand(*kind)),
        }
    }

    /// Resolve the table through the catalog, then scan it
    pub fn select(&self, stmt: &SelectStmt) -> Result<SelectResult> {
        let schema = self.catalog.resolve(&stmt.table)?;
        self.select_with_schema(stmt, &schema)
    }

    /// Scan with an already resolved schema
    pub fn select_with_schema(&self, stmt: &SelectStmt, schema: &TableSchema) -> Result<SelectResult> {
        let plan = self.plan(stmt, schema)?;

        let mut handle = self.storage.open(&stmt.table)?;
        let chunk = self.storage.read_chunk(&mut handle, 0, self.chunk_size);
        self.storage.close(handle)?;
        let chunk = chunk?;

        let result = Self::scan_chunk(&plan, &chunk)?;
        debug!(
            table = %stmt.table,
            valid_bytes = chunk.valid_bytes,
            rows = result.rows.len(),
            truncated = result.truncated,
            "select finished"
        );
        if result.truncated {
            warn!(
                table = %stmt.table,
                chunk_size = self.chunk_size,
                "table is larger than one chunk; result holds only the first chunk's rows"
            );
        }

        Ok(result)
    }

    /// Validate fields and predicate against the schema
    fn plan<'a>(&self, stmt: &'a SelectStmt, schema: &TableSchema) -> Result<ScanPlan<'a>> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(StorageError::InvalidArgument(format!(
                "chunk_size must be between 1 and {} bytes, got {}",
                MAX_CHUNK_SIZE, self.chunk_size
            )));
        }

        let names: Vec<&str> = match &stmt.fields {
            FieldList::Wildcard => schema.column_names().collect(),
            FieldList::Columns(columns) => columns.iter().map(String::as_str).collect(),
        };
        let projection = names
            .into_iter()
            .map(|name| bind(schema, name))
            .collect::<Result<Vec<_>>>()?;

        let filter = match &stmt.predicate {
            Some(clause) => {
                let column = bind(schema, &clause.field)?;
                check_comparable(&column, &clause.value)?;
                Some((clause, column))
            }
            None => None,
        };

        Ok(ScanPlan {
            projection,
            filter,
            row_byte_size: schema.row_byte_size(),
        })
    }

    /// Decode the whole rows of a chunk; trailing partial rows are dropped
    fn scan_chunk(plan: &ScanPlan<'_>, chunk: &RowChunk) -> Result<SelectResult> {
        let row_count = chunk.whole_rows(plan.row_byte_size);
        let consumed = row_count * plan.row_byte_size as usize;
        if consumed < chunk.valid_bytes {
            trace!(
                discarded = chunk.valid_bytes - consumed,
                "dropping trailing partial row"
            );
        }

        let mut rows = Vec::new();
        for index in 0..row_count {
            let Some(row) = chunk.row(index, plan.row_byte_size) else {
                break;
            };

            if let Some((clause, column)) = &plan.filter {
                if !clause.matches(&decode_at(row, column)?) {
                    continue;
                }
            }

            let mut record = RowRecord::with_capacity(plan.projection.len());
            for column in &plan.projection {
                record.insert(column.name.clone(), decode_at(row, column)?);
            }
            rows.push(record);
        }

        let resume_offset = chunk
            .next_offset
            .map(|_| chunk.offset + consumed as u64);

        Ok(SelectResult {
            columns: plan.projection.iter().map(|c| c.name.clone()).collect(),
            rows,
            truncated: chunk.is_truncated(),
            resume_offset,
        })
    }
}

fn bind(schema: &TableSchema, name: &str) -> Result<BoundColumn> {
    let (def, offset) = schema
        .get_column(name)
        .ok_or_else(|| StorageError::UnknownColumn(name.to_string()))?;
    Ok(BoundColumn {
        name: def.name.clone(),
        field_type: def.field_type,
        offset,
    })
}

/// Integer literals compare against Int/Date columns, text literals against Char
fn check_comparable(column: &BoundColumn, value: &Value) -> Result<()> {
    let ok = match value {
        Value::Integer(_) => column.field_type.is_integer(),
        Value::Text(_) => !column.field_type.is_integer(),
    };
    if ok {
        Ok(())
    } else {
        Err(StorageError::TypeMismatch {
            column: column.name.clone(),
            expected: column.field_type.to_string(),
            found: value.kind().to_string(),
        })
    }
}

fn decode_at(row: &[u8], column: &BoundColumn) -> Result<Value> {
    let bytes = row.get(column.offset as usize..).unwrap_or(&[]);
    codec::decode(column.field_type, bytes)
}
