//! Typed query parameters.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::types::WarehouseType;
use crate::model::Value;

/// A named, typed parameter bound to an `@name` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: WarehouseType,
    pub value: Value,
}

impl QueryParameter {
    pub fn new(name: impl Into<String>, data_type: WarehouseType, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            data_type,
            value: value.into(),
        }
    }

    /// Parameter type name. Parameters are a standard SQL feature, so the
    /// standard spelling is used regardless of dialect.
    pub fn type_name(&self) -> &'static str {
        self.data_type.standard_name()
    }
}

/// Hands out parameter names that are unique within one query.
///
/// The first use of a field gets the field name itself; repeats get
/// `_1`, `_2`, ... suffixes.
#[derive(Debug, Default)]
pub struct ParameterNames {
    used: HashSet<String>,
}

impl ParameterNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, field: &str) -> String {
        let base = sanitize(field);
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}_{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Parameter names must match `[A-Za-z_][A-Za-z0-9_]*`.
fn sanitize(field: &str) -> String {
    let mut name: String = field
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        name.insert(0, '_');
    }
    name
}
