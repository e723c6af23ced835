//! Warehouse clients.
//!
//! The execution adapter talks to BigQuery through [`WarehouseClient`], and
//! creates its client lazily through a [`Connector`]:
//!
//! - [`BqCommandClient`] - drives the Google Cloud `bq` command-line tool
//! - [`MemoryClient`] - canned rows and recorded queries

mod bq;
mod error;
mod memory;

pub use bq::BqCommandClient;
pub use error::{ClientError, ClientResult};
pub use memory::{MemoryClient, RecordedQuery};

use crate::config::FdwOptions;
use crate::model::{Row, Value};
use crate::sql::dialect::Dialect;
use crate::sql::params::QueryParameter;

/// Rows returned by a client, pulled one at a time.
pub type RowStream<'a> = Box<dyn Iterator<Item = ClientResult<Row>> + 'a>;

/// Runs one parameterized statement and returns its rows.
pub trait WarehouseClient {
    fn run_query(
        &self,
        sql: &str,
        parameters: &[QueryParameter],
        dialect: Dialect,
    ) -> ClientResult<RowStream<'_>>;
}

/// Creates the client for a table's options.
pub trait Connector {
    type Client: WarehouseClient;

    fn connect(&self, options: &FdwOptions) -> ClientResult<Self::Client>;
}

impl<F, C> Connector for F
where
    F: Fn(&FdwOptions) -> ClientResult<C>,
    C: WarehouseClient,
{
    type Client = C;

    fn connect(&self, options: &FdwOptions) -> ClientResult<C> {
        self(options)
    }
}

/// Convert one JSON result object to a row.
pub(crate) fn row_from_json(value: serde_json::Value) -> ClientResult<Row> {
    let serde_json::Value::Object(map) = value else {
        return Err(ClientError::UnexpectedRow(value.to_string()));
    };
    Ok(map
        .into_iter()
        .map(|(k, v)| (k, value_from_json(v)))
        .collect())
}

fn value_from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::String(s),
        nested => Value::String(nested.to_string()),
    }
}
