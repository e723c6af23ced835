//! Shared helper functions for the BigQuery dialect implementations.

use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// Identifier Quoting
// =============================================================================

static BARE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// BigQuery reserved keywords (shared by both dialects).
///
/// A column with one of these names must be quoted.
const RESERVED_WORDS: &[&str] = &[
    "all", "and", "any", "array", "as", "asc", "assert_rows_modified", "at", "between", "by",
    "case", "cast", "collate", "contains", "create", "cross", "cube", "current", "default",
    "define", "desc", "distinct", "else", "end", "enum", "escape", "except", "exclude", "exists",
    "extract", "false", "fetch", "following", "for", "from", "full", "group", "grouping",
    "groups", "hash", "having", "if", "ignore", "in", "inner", "intersect", "interval", "into",
    "is", "join", "lateral", "left", "like", "limit", "lookup", "merge", "natural", "new", "no",
    "not", "null", "nulls", "of", "on", "or", "order", "outer", "over", "partition", "preceding",
    "proto", "qualify", "range", "recursive", "respect", "right", "rollup", "rows", "select",
    "set", "some", "struct", "tablesample", "then", "to", "treat", "true", "unbounded", "union",
    "unnest", "using", "when", "where", "window", "with", "within",
];

/// Whether an identifier can be emitted without quoting.
pub fn is_bare_identifier(ident: &str) -> bool {
    BARE_IDENTIFIER.is_match(ident) && !RESERVED_WORDS.contains(&ident.to_lowercase().as_str())
}

/// Quote identifier with backticks.
/// Used by: standard SQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('\\', "\\\\").replace('`', "\\`"))
}

/// Quote identifier with square brackets.
/// Used by: legacy SQL
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', ""))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with double quotes, escaping backslashes and quotes.
/// Used by: both dialects (function arguments such as timezone names)
pub fn quote_string_double(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

// =============================================================================
// Table Paths
// =============================================================================

/// Legacy SQL separates the project from the dataset with a colon:
/// `project.dataset` becomes `project:dataset`.
pub fn legacy_dataset_path(dataset: &str) -> String {
    match dataset.split_once('.') {
        Some((project, rest)) if !project.contains(':') => format!("{project}:{rest}"),
        _ => dataset.to_string(),
    }
}
