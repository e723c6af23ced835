//! Per-column cast overrides.
//!
//! The `casting` option holds a JSON object mapping column names to
//! warehouse types:
//!
//! ```text
//! {"number": "STRING", "year": "INT64"}
//! ```

use std::collections::BTreeMap;

use tracing::warn;

use super::ConfigError;
use crate::sql::expr::{cast, Expr};
use crate::sql::types::WarehouseType;

/// Column name to target type overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CastingRules {
    rules: BTreeMap<String, WarehouseType>,
}

impl CastingRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the raw option value.
    ///
    /// Empty input and JSON that is not an object (hosts commonly send
    /// `false` for "no casting") give an empty rule set. Unparseable JSON is
    /// ignored with a warning. An object whose values are not known type
    /// names is an error.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::new());
        }

        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "ignoring casting option that is not valid JSON");
                return Ok(Self::new());
            }
        };

        let serde_json::Value::Object(map) = value else {
            return Ok(Self::new());
        };

        let mut rules = BTreeMap::new();
        for (column, target) in map {
            let ty = target
                .as_str()
                .and_then(WarehouseType::parse)
                .ok_or_else(|| ConfigError::InvalidCastType {
                    column: column.clone(),
                    value: target.to_string(),
                })?;
            rules.insert(column, ty);
        }
        Ok(Self { rules })
    }

    pub fn insert(&mut self, column: impl Into<String>, ty: WarehouseType) {
        self.rules.insert(column.into(), ty);
    }

    pub fn get(&self, column: &str) -> Option<WarehouseType> {
        self.rules.get(column).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, WarehouseType)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Wrap `expr` in a CAST when `column` has an override.
    ///
    /// `inferred` is the column's own warehouse type; a cast BigQuery does
    /// not permit from it is still emitted, with a warning.
    pub fn cast_column(&self, column: &str, expr: Expr, inferred: WarehouseType) -> Expr {
        let Some(target) = self.get(column) else {
            return expr;
        };
        if !inferred.can_cast_to(target) {
            warn!(
                column,
                from = %inferred,
                to = %target,
                "cast is not a permitted conversion"
            );
        }
        cast(expr, target)
    }
}

impl FromIterator<(String, WarehouseType)> for CastingRules {
    fn from_iter<I: IntoIterator<Item = (String, WarehouseType)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
