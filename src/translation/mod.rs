//! Translation of host scans into SQL fragments.
//!
//! - [`qual`] - qualifiers to WHERE predicates and typed parameters
//! - [`projection`] - column lists for SELECT and GROUP BY
//! - [`timezone`] - DATE/DATETIME timezone normalization

pub mod projection;
pub mod qual;
pub mod timezone;

use serde::Serialize;

use crate::model::{ListQuantifier, Operator, UnsupportedOperatorError};

pub use projection::{ColumnListBuilder, ProjectionMode};
pub use qual::{
    build_where_clause, qualifiers_from_host, translate_qualifier, SkippedQualifier,
    TranslatedQualifier, WhereClause,
};
pub use timezone::{set_time_zone, TimeZone};

/// Why a qualifier could not be translated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum TranslateError {
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("cannot filter on aggregate column {0}")]
    AggregateFilter(String),

    #[error("cannot compare {field} with NULL using {operator}")]
    NullComparison { field: String, operator: Operator },

    #[error("empty value list for {0}")]
    EmptyList(String),

    #[error("unsupported list comparison on {field}: {operator} {quantifier:?}")]
    UnsupportedList {
        field: String,
        operator: Operator,
        quantifier: ListQuantifier,
    },
}

impl From<UnsupportedOperatorError> for TranslateError {
    fn from(e: UnsupportedOperatorError) -> Self {
        TranslateError::UnsupportedOperator(e.0)
    }
}
