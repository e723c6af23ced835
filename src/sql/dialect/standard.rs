//! BigQuery standard SQL dialect.
//!
//! - Backtick identifier quoting
//! - Named query parameters (`@name`)
//! - Fully qualified tables as one quoted path: `` `project.dataset.table` ``

use super::helpers;
use super::SqlDialect;
use crate::sql::types::WarehouseType;

/// BigQuery standard SQL.
#[derive(Debug, Clone, Copy)]
pub struct Standard;

impl SqlDialect for Standard {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn table_reference(&self, dataset: &str, table: &str) -> String {
        helpers::quote_backtick(&format!("{dataset}.{table}"))
    }

    fn type_name(&self, ty: WarehouseType) -> &'static str {
        ty.standard_name()
    }
}
