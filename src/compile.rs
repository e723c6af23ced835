//! Compilation of a foreign-table scan into one BigQuery statement.
//!
//! ```text
//! qualifiers ──► translation::qual ───────► WHERE + parameters ─┐
//! columns ─────► translation::projection ─► SELECT / GROUP BY ──┴─► CompiledQuery
//! ```
//!
//! # Example
//!
//! ```ignore
//! use bqfdw::compile::QueryCompiler;
//! use bqfdw::config::FdwOptions;
//! use bqfdw::model::{columns, Operator, Qualifier};
//! use bqfdw::sql::RelationalType;
//!
//! let options = FdwOptions::new("bigquery-public-data.usa_names", "usa_1910_current");
//! let schema = columns([("name", RelationalType::Text), ("number", RelationalType::BigInt)]);
//! let quals = vec![Qualifier::new("number", Operator::Gt, 1000)];
//!
//! let compiled = QueryCompiler::new(&options, &schema).build_query(&quals, Some(&schema))?;
//! println!("{}", compiled.sql);
//! ```

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::FdwOptions;
use crate::model::{ColumnDefinition, Qualifier, Value};
use crate::sql::dialect::{Dialect, SqlDialect};
use crate::sql::params::QueryParameter;
use crate::sql::query::{Query, TableRef};
use crate::translation::{
    build_where_clause, qualifiers_from_host, ColumnListBuilder, ProjectionMode,
    SkippedQualifier, TranslateError,
};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during compilation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Unknown column in qualifier: {0}")]
    UnknownColumn(String),

    #[error("Translation error: {0}")]
    Translate(TranslateError),
}

impl From<TranslateError> for CompileError {
    fn from(e: TranslateError) -> Self {
        match e {
            TranslateError::UnknownColumn(name) => CompileError::UnknownColumn(name),
            other => CompileError::Translate(other),
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

// ============================================================================
// Result Types
// ============================================================================

/// A statement ready for submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    /// The generated SQL string.
    pub sql: String,

    /// Parameters in placeholder order.
    pub parameters: Vec<QueryParameter>,

    /// Qualifiers left for the host to re-check.
    pub skipped: Vec<SkippedQualifier>,

    /// The dialect used for generation.
    pub dialect: Dialect,
}

impl CompiledQuery {
    /// Content hash of the statement: SHA-256 over the dialect, SQL and
    /// parameters, as 64 lowercase hex characters.
    ///
    /// Equal for equal inputs; callers may use it as a cache key.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.dialect.name().as_bytes());
        hasher.update([0]);
        hasher.update(self.sql.as_bytes());
        for p in &self.parameters {
            hasher.update([0]);
            hasher.update(p.name.as_bytes());
            hasher.update([0]);
            hasher.update(p.type_name().as_bytes());
            hasher.update([0, value_tag(&p.value)]);
            hasher.update(p.value.to_param_string().as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Distinguishes values whose parameter text is equal, such as `NULL` and
/// `'NULL'`.
fn value_tag(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) => 2,
        Value::Float(_) => 3,
        Value::String(_) => 4,
    }
}

// ============================================================================
// Compiler
// ============================================================================

/// Compiles scans of one foreign table.
#[derive(Debug, Clone, Copy)]
pub struct QueryCompiler<'a> {
    options: &'a FdwOptions,
    schema: &'a [ColumnDefinition],
}

impl<'a> QueryCompiler<'a> {
    /// `schema` is the table's full column list; qualifiers are resolved
    /// against it.
    pub fn new(options: &'a FdwOptions, schema: &'a [ColumnDefinition]) -> Self {
        Self { options, schema }
    }

    pub fn dialect(&self) -> Dialect {
        self.options.dialect
    }

    /// Compile a scan.
    ///
    /// `columns` is the projection; `None` selects `*`. GROUP BY is added
    /// when grouping is enabled and the projection has grouping keys.
    pub fn build_query(
        &self,
        quals: &[Qualifier],
        columns: Option<&[ColumnDefinition]>,
    ) -> CompileResult<CompiledQuery> {
        let dialect = self.options.dialect;
        let builder = ColumnListBuilder::from_options(self.options);

        let clause = build_where_clause(quals, self.schema)?;

        let mut query = Query::new(TableRef::new(&self.options.dataset, &self.options.table))
            .select(builder.build(columns, ProjectionMode::Select))
            .filters(clause.predicates);

        if self.options.group_by {
            query = query.group_by(builder.build(columns, ProjectionMode::GroupBy));
        }

        let compiled = CompiledQuery {
            sql: query.to_sql(dialect),
            parameters: clause.parameters,
            skipped: clause.skipped,
            dialect,
        };

        if !compiled.parameters.is_empty() && !dialect.supports_query_parameters() {
            warn!(
                dialect = %dialect,
                count = compiled.parameters.len(),
                "query parameters are only accepted in standard SQL"
            );
        }

        self.log_query(&compiled);
        Ok(compiled)
    }

    /// Compile a scan from the host's raw `(field, operator, value)` triples.
    ///
    /// Triples with unsupported operators are reported in
    /// [`CompiledQuery::skipped`] alongside the ones translation skipped.
    pub fn build_host_query<I, F, O>(
        &self,
        quals: I,
        columns: Option<&[ColumnDefinition]>,
    ) -> CompileResult<CompiledQuery>
    where
        I: IntoIterator<Item = (F, O, Value)>,
        F: Into<String>,
        O: AsRef<str>,
    {
        let (typed, mut skipped) = qualifiers_from_host(quals);
        let mut compiled = self.build_query(&typed, columns)?;
        skipped.append(&mut compiled.skipped);
        compiled.skipped = skipped;
        Ok(compiled)
    }

    fn log_query(&self, compiled: &CompiledQuery) {
        let params = compiled
            .parameters
            .iter()
            .map(|p| format!("{}:{}={}", p.name, p.type_name(), p.value.to_param_string()))
            .collect::<Vec<_>>()
            .join(", ");

        if self.options.verbose {
            info!(sql = %compiled.sql, parameters = %params, "compiled query");
        } else {
            debug!(sql = %compiled.sql, parameters = %params, "compiled query");
        }
    }
}
