//! Scalar values carried by qualifiers, parameters and result rows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sql::types::{RelationalType, WarehouseType};

/// A scalar value.
///
/// Dates and timestamps travel as ISO-8601 strings; their column's declared
/// type decides how BigQuery interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Coerce a string value to the column's relational type when it parses.
    ///
    /// BigQuery's JSON output renders every scalar as a string; values that
    /// don't parse are returned unchanged.
    pub fn coerce(self, ty: RelationalType) -> Value {
        let Value::String(s) = &self else {
            return self;
        };
        match ty.warehouse_type() {
            WarehouseType::Int64 => s.parse().map(Value::Int).unwrap_or(self),
            WarehouseType::Float64 => s.parse().map(Value::Float).unwrap_or(self),
            WarehouseType::Bool => match s.to_lowercase().as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => self,
            },
            _ => self,
        }
    }

    /// Render the value for a command-line query parameter.
    pub fn to_param_string(&self) -> String {
        match self {
            Value::Null => "NULL".into(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => {
                let mut buffer = ryu::Buffer::new();
                buffer.format(*f).to_string()
            }
            Value::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            other => f.write_str(&other.to_param_string()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
