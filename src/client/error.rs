//! Warehouse client error types.

use std::io;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while running a query on the warehouse.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to spawn the `bq` process.
    #[error("failed to spawn {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    /// `bq` exited with a failure status.
    #[error("query failed (exit status {status:?}): {stderr}")]
    CommandFailed { status: Option<i32>, stderr: String },

    /// Waiting on the `bq` process failed.
    #[error("failed to wait for query process: {0}")]
    Wait(#[source] io::Error),

    /// The thread decoding `bq` output panicked.
    #[error("query output reader panicked")]
    ReaderPanicked,

    /// Output was not the expected JSON row array.
    #[error("failed to parse query output: {0}")]
    InvalidOutput(#[source] serde_json::Error),

    /// A result row was not a JSON object.
    #[error("unexpected row in query output: {0}")]
    UnexpectedRow(String),

    /// The warehouse rejected the query.
    #[error("warehouse error: {0}")]
    Remote(String),
}

impl ClientError {
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }
}
