//! # bqfdw
//!
//! Query translation for reading BigQuery tables through a foreign-data
//! wrapper host.
//!
//! ## Architecture
//!
//! The host hands down a column projection and filter qualifiers; the
//! wrapper compiles them into one parameterized statement, runs it, and
//! streams rows back in the host's column order:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          Host scan (columns + qualifiers)                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [translation]
//! ┌─────────────────────────────────────────────────────────┐
//! │   SELECT list · WHERE predicates · typed parameters      │
//! │   (casting, timezone, pseudo columns)                    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compile]
//! ┌─────────────────────────────────────────────────────────┐
//! │      CompiledQuery (standard or legacy SQL)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [execute + client]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Rows reshaped to the requested columns              │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod compile;
pub mod config;
pub mod execute;
pub mod logging;
pub mod model;
pub mod sql;
pub mod translation;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::types;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::client::{BqCommandClient, Connector, MemoryClient, WarehouseClient};
    pub use crate::compile::{CompileError, CompiledQuery, QueryCompiler};
    pub use crate::config::{CastingRules, FdwOptions, TableConfig};
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::execute::{ExecuteError, ForeignTable, Rows};
    pub use crate::model::{
        columns, ColumnDefinition, ColumnKind, Operator, Qualifier, Row, Value,
    };
    pub use crate::translation::{ColumnListBuilder, ProjectionMode, TimeZone};
    pub use crate::types::{RelationalType, WarehouseType};
}

// Also export at crate root for convenience
pub use compile::{CompiledQuery, QueryCompiler};
pub use config::FdwOptions;
pub use dialect::Dialect;
pub use execute::ForeignTable;
