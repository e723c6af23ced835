//! BigQuery SQL dialect definitions and formatting rules.
//!
//! BigQuery accepts two SQL dialects. Each implements `SqlDialect`:
//!
//! | Concern | Standard | Legacy |
//! |---------|----------|--------|
//! | Identifier quoting | `` `col` `` | `[col]` |
//! | Table path | `` `project.dataset.table` `` | `[project:dataset.table]` |
//! | 64-bit integer | `INT64` | `INTEGER` |
//! | Query parameters | `@name` | ❌ |
//!
//! # Usage
//!
//! ```ignore
//! use bqfdw::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::parse(Some("legacy"));
//! let quoted = dialect.quote_identifier("group");  // [group]
//! ```

pub mod helpers;
mod legacy;
mod standard;

pub use legacy::Legacy;
pub use standard::Standard;

use serde::{Deserialize, Serialize};

use super::types::WarehouseType;

/// SQL dialect trait - defines how SQL constructs are rendered.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Render an identifier, quoting only when it is not a simple name.
    fn format_identifier(&self, ident: &str) -> String {
        if helpers::is_bare_identifier(ident) {
            ident.to_string()
        } else {
            self.quote_identifier(ident)
        }
    }

    /// Quote a string literal.
    ///
    /// Both dialects accept double-quoted strings with backslash escapes.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_double(s)
    }

    /// Render the FROM target for `dataset.table`.
    fn table_reference(&self, dataset: &str, table: &str) -> String;

    // =========================================================================
    // Types
    // =========================================================================

    /// Spelling of a warehouse type in this dialect.
    fn type_name(&self, ty: WarehouseType) -> &'static str;

    // =========================================================================
    // Pseudo Columns
    // =========================================================================

    /// Physical column holding an ingestion-time partition's timestamp.
    fn partition_time_column(&self) -> &'static str {
        "_PARTITIONTIME"
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Whether BigQuery accepts named parameters for this dialect.
    fn supports_query_parameters(&self) -> bool {
        true
    }

    /// Render a named parameter placeholder.
    fn format_parameter(&self, name: &str) -> String {
        format!("@{name}")
    }
}

/// Supported BigQuery dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Standard,
    Legacy,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Standard => &Standard,
            Dialect::Legacy => &Legacy,
        }
    }

    /// Resolve the `sql_dialect` option.
    ///
    /// Missing or unrecognized values fall back to standard SQL.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            None => Dialect::Standard,
            Some(v) if v.is_empty() || v == "standard" => Dialect::Standard,
            Some(v) if v == "legacy" => Dialect::Legacy,
            Some(other) => {
                tracing::warn!(
                    sql_dialect = %other,
                    "unrecognized SQL dialect, falling back to standard"
                );
                Dialect::Standard
            }
        }
    }

    /// Value for the BigQuery `useLegacySql` flag.
    pub fn use_legacy_sql(&self) -> bool {
        matches!(self, Dialect::Legacy)
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn format_identifier(&self, ident: &str) -> String {
        self.dialect().format_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn table_reference(&self, dataset: &str, table: &str) -> String {
        self.dialect().table_reference(dataset, table)
    }

    fn type_name(&self, ty: WarehouseType) -> &'static str {
        self.dialect().type_name(ty)
    }

    fn partition_time_column(&self) -> &'static str {
        self.dialect().partition_time_column()
    }

    fn supports_query_parameters(&self) -> bool {
        self.dialect().supports_query_parameters()
    }

    fn format_parameter(&self, name: &str) -> String {
        self.dialect().format_parameter(name)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}
