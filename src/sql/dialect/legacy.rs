//! BigQuery legacy SQL dialect.
//!
//! - Square bracket quoting for identifiers and tables
//! - `project:dataset.table` table paths
//! - Legacy type spellings (`INTEGER`, `FLOAT`, `BOOLEAN`)
//! - No query parameter support on the BigQuery side

use super::helpers;
use super::SqlDialect;
use crate::sql::types::WarehouseType;

/// BigQuery legacy SQL.
#[derive(Debug, Clone, Copy)]
pub struct Legacy;

impl SqlDialect for Legacy {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn table_reference(&self, dataset: &str, table: &str) -> String {
        helpers::quote_bracket(&format!("{}.{table}", helpers::legacy_dataset_path(dataset)))
    }

    fn type_name(&self, ty: WarehouseType) -> &'static str {
        ty.legacy_name()
    }

    fn supports_query_parameters(&self) -> bool {
        false
    }
}
