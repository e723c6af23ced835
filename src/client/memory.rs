//! In-memory client returning canned rows.

use std::cell::RefCell;

use super::error::{ClientError, ClientResult};
use super::{RowStream, WarehouseClient};
use crate::model::Row;
use crate::sql::dialect::Dialect;
use crate::sql::params::QueryParameter;

/// A query the client received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub sql: String,
    pub parameters: Vec<QueryParameter>,
    pub dialect: Dialect,
}

/// Returns the same rows for every query and records what it was asked.
#[derive(Debug, Default)]
pub struct MemoryClient {
    rows: Vec<Row>,
    failure: Option<String>,
    queries: RefCell<Vec<RecordedQuery>>,
}

impl MemoryClient {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// A client whose every query fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.borrow().clone()
    }

    pub fn last_query(&self) -> Option<RecordedQuery> {
        self.queries.borrow().last().cloned()
    }
}

impl WarehouseClient for MemoryClient {
    fn run_query(
        &self,
        sql: &str,
        parameters: &[QueryParameter],
        dialect: Dialect,
    ) -> ClientResult<RowStream<'_>> {
        self.queries.borrow_mut().push(RecordedQuery {
            sql: sql.to_string(),
            parameters: parameters.to_vec(),
            dialect,
        });

        if let Some(message) = &self.failure {
            return Err(ClientError::remote(message.clone()));
        }
        Ok(Box::new(self.rows.iter().cloned().map(Ok)))
    }
}
