//! SQL generation module.
//!
//! This module provides a type-safe SQL builder that generates BigQuery SQL
//! in either dialect. It includes:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression and predicate AST
//! - [`params`] - Typed query parameters
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - Standard and legacy dialect implementations
//! - [`types`] - Relational and warehouse type catalog
//! - [`validate`] - sqlparser roundtrip validation

pub mod dialect;
pub mod expr;
pub mod params;
pub mod query;
pub mod token;
pub mod types;
pub mod validate;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{cast, col, func, param, Expr, Predicate};
pub use params::{ParameterNames, QueryParameter};
pub use query::{Query, TableRef};
pub use token::{Token, TokenStream};
pub use types::{
    conversion_rules, resolve_type, resolve_type_name, type_mappings, ConversionRule,
    RelationalType, TypeMapping, UnsupportedTypeError, WarehouseType,
};
pub use validate::validate_sql;
