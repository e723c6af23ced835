//! Inputs and outputs exchanged with the host query engine.
//!
//! - [`column`] - column definitions and pseudo-column kinds
//! - [`qual`] - filter predicates and operators
//! - [`value`] - scalar values
//! - [`row`] - ordered result records

pub mod column;
pub mod qual;
pub mod row;
pub mod value;

pub use column::{columns, find_column, ColumnDefinition, ColumnKind, COUNT_COLUMN, PARTITION_COLUMN};
pub use qual::{
    translate_operator, ListQuantifier, Operator, QualParseError, QualValue, Qualifier,
    UnsupportedOperatorError,
};
pub use row::Row;
pub use value::Value;
