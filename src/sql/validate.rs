//! Syntax validation of emitted SQL.
//!
//! Uses sqlparser-rs to parse generated statements, giving a roundtrip
//! check that the compiler's output is well-formed BigQuery SQL.

use sqlparser::dialect::BigQueryDialect;
use sqlparser::parser::Parser;

use super::dialect::Dialect;

/// Validates that a SQL string is syntactically valid for the given dialect.
///
/// sqlparser only knows BigQuery standard SQL; legacy SQL (bracketed table
/// paths) is rejected with an error rather than silently accepted.
///
/// # Example
///
/// ```ignore
/// use bqfdw::sql::{validate_sql, Dialect};
///
/// validate_sql("SELECT * FROM `ds.t`", Dialect::Standard).unwrap();
/// ```
pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    if dialect == Dialect::Legacy {
        return Err(format!("cannot validate legacy SQL\nSQL: {}", sql));
    }

    Parser::parse_sql(&BigQueryDialect {}, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL for {}: {}\nSQL: {}", dialect, e, sql))
}
