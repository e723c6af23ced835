//! Execution of compiled scans and reshaping of their rows.
//!
//! A [`ForeignTable`] owns one table's options and schema. Its client is
//! created on first use and reused for every later scan.

use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::client::{ClientError, Connector, RowStream, WarehouseClient};
use crate::compile::{CompileError, CompileResult, CompiledQuery, QueryCompiler};
use crate::config::FdwOptions;
use crate::model::{find_column, ColumnDefinition, Qualifier, Row, Value};
use crate::sql::dialect::Dialect;
use crate::sql::types::resolve_type;
use crate::translation::SkippedQualifier;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while executing a scan.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("Query execution failed: {0}")]
    Execution(#[from] ClientError),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Row shape mismatch: expected columns {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

pub type ExecuteResult<T> = Result<T, ExecuteError>;

// ============================================================================
// Foreign Table
// ============================================================================

/// One remote table as the host sees it.
pub struct ForeignTable<K: Connector> {
    options: FdwOptions,
    schema: Vec<ColumnDefinition>,
    connector: K,
    client: OnceCell<K::Client>,
}

impl<K: Connector> ForeignTable<K> {
    pub fn new(options: FdwOptions, schema: Vec<ColumnDefinition>, connector: K) -> Self {
        Self {
            options,
            schema,
            connector,
            client: OnceCell::new(),
        }
    }

    pub fn options(&self) -> &FdwOptions {
        &self.options
    }

    pub fn schema(&self) -> &[ColumnDefinition] {
        &self.schema
    }

    /// The warehouse client, connecting on first call.
    pub fn client(&self) -> ExecuteResult<&K::Client> {
        let client = self.client.get_or_try_init(|| {
            debug!(dataset = %self.options.dataset, table = %self.options.table, "connecting");
            self.connector.connect(&self.options)
        })?;
        Ok(client)
    }

    /// Compile a scan without running it.
    pub fn build_query(
        &self,
        quals: &[Qualifier],
        columns: Option<&[ColumnDefinition]>,
    ) -> CompileResult<CompiledQuery> {
        QueryCompiler::new(&self.options, &self.schema).build_query(quals, columns)
    }

    /// Warehouse type name of a column, in `dialect` or the table's own.
    pub fn warehouse_type(&self, column: &str, dialect: Option<Dialect>) -> ExecuteResult<&'static str> {
        let column = find_column(&self.schema, column)
            .ok_or_else(|| ExecuteError::UnknownColumn(column.to_string()))?;
        Ok(resolve_type(
            column.relational_type,
            dialect.unwrap_or(self.options.dialect),
        ))
    }

    /// Resolve requested column names against the schema, keeping their order.
    pub fn resolve_columns<S: AsRef<str>>(&self, names: &[S]) -> ExecuteResult<Vec<ColumnDefinition>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                find_column(&self.schema, name)
                    .cloned()
                    .ok_or_else(|| ExecuteError::UnknownColumn(name.to_string()))
            })
            .collect()
    }

    /// Run a scan.
    ///
    /// Rows carry exactly `requested` columns, in that order. An empty
    /// request selects `*` and yields empty rows.
    pub fn execute<S: AsRef<str>>(
        &self,
        quals: &[Qualifier],
        requested: &[S],
    ) -> ExecuteResult<Rows<'_>> {
        let columns = self.resolve_columns(requested)?;
        let wildcard = columns.is_empty();
        let projection = (!wildcard).then_some(columns.as_slice());

        let query = self.build_query(quals, projection)?;
        let client = self.client()?;

        debug!(sql = %query.sql, "executing scan");
        let inner = client.run_query(&query.sql, &query.parameters, query.dialect)?;

        Ok(Rows {
            inner,
            columns,
            wildcard,
            query,
            done: false,
        })
    }
}

// ============================================================================
// Rows
// ============================================================================

/// Rows of one scan, reshaped to the requested columns.
///
/// Stops after the first error.
pub struct Rows<'a> {
    inner: RowStream<'a>,
    columns: Vec<ColumnDefinition>,
    wildcard: bool,
    query: CompiledQuery,
    done: bool,
}

impl Rows<'_> {
    /// The statement that produced these rows.
    pub fn query(&self) -> &CompiledQuery {
        &self.query
    }

    /// Qualifiers the warehouse did not apply.
    pub fn skipped(&self) -> &[SkippedQualifier] {
        &self.query.skipped
    }

    fn reshape(&self, row: Row) -> ExecuteResult<Row> {
        let missing = self.columns.iter().any(|c| row.get(&c.name).is_none());
        let extra = !self.wildcard && row.keys().any(|k| find_column(&self.columns, k).is_none());
        if missing || extra {
            return Err(self.mismatch(&row));
        }

        Ok(self
            .columns
            .iter()
            .map(|c| {
                let value = row.get(&c.name).cloned().unwrap_or(Value::Null);
                (c.name.clone(), value.coerce(c.relational_type))
            })
            .collect())
    }

    fn mismatch(&self, row: &Row) -> ExecuteError {
        ExecuteError::ShapeMismatch {
            expected: self.columns.iter().map(|c| c.name.clone()).collect(),
            actual: row.keys().map(str::to_string).collect(),
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = ExecuteResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.inner.next()? {
            Ok(row) => self.reshape(row),
            Err(e) => Err(e.into()),
        };
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
