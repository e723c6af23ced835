//! Filter predicates handed down by the host.
//!
//! A [`Qualifier`] is `(field, operator, value)`. Operators arrive in the
//! host's spelling: PostgreSQL pattern matching is `~~` / `!~~`, and array
//! comparisons (`= ANY(...)`, `<> ALL(...)`) carry a list value with a
//! quantifier.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::value::Value;
use crate::sql::token::Token;

/// An operator outside the translation table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported operator: {0}")]
pub struct UnsupportedOperatorError(pub String);

/// Comparison operators the translator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
}

impl Operator {
    /// Parse a host operator.
    ///
    /// `IS` and `IS NOT` are the null-test spellings of `=` and `!=`.
    pub fn parse(op: &str) -> Result<Self, UnsupportedOperatorError> {
        let normalized = op.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        let parsed = match normalized.as_str() {
            "=" | "IS" => Operator::Eq,
            "!=" | "<>" | "IS NOT" => Operator::Ne,
            "<" => Operator::Lt,
            "<=" => Operator::Le,
            ">" => Operator::Gt,
            ">=" => Operator::Ge,
            "~~" => Operator::Like,
            "!~~" => Operator::NotLike,
            _ => return Err(UnsupportedOperatorError(op.to_string())),
        };
        Ok(parsed)
    }

    /// BigQuery spelling.
    pub fn to_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
        }
    }

    pub(crate) fn tokens(self) -> Vec<Token> {
        match self {
            Operator::Eq => vec![Token::Eq],
            Operator::Ne => vec![Token::Ne],
            Operator::Lt => vec![Token::Lt],
            Operator::Le => vec![Token::Lte],
            Operator::Gt => vec![Token::Gt],
            Operator::Ge => vec![Token::Gte],
            Operator::Like => vec![Token::Like],
            Operator::NotLike => vec![Token::Not, Token::Space, Token::Like],
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sql())
    }
}

/// Map a host operator to its BigQuery spelling.
pub fn translate_operator(op: &str) -> Result<&'static str, UnsupportedOperatorError> {
    Operator::parse(op).map(Operator::to_sql)
}

/// How a list value combines with the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListQuantifier {
    /// `op ANY(list)`: the predicates are OR-ed
    Any,
    /// `op ALL(list)`: the predicates are AND-ed
    All,
}

/// Right-hand side of a qualifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualValue {
    Null,
    Scalar(Value),
    List {
        values: Vec<Value>,
        quantifier: ListQuantifier,
    },
}

impl From<Value> for QualValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => QualValue::Null,
            other => QualValue::Scalar(other),
        }
    }
}

/// A single filter predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    pub field_name: String,
    pub operator: Operator,
    pub value: QualValue,
}

impl Qualifier {
    pub fn new(field_name: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field_name: field_name.into(),
            operator,
            value: QualValue::from(value.into()),
        }
    }

    /// `field = ANY(values)`, i.e. `field IN (...)`.
    pub fn any(field_name: impl Into<String>, operator: Operator, values: Vec<Value>) -> Self {
        Self {
            field_name: field_name.into(),
            operator,
            value: QualValue::List {
                values,
                quantifier: ListQuantifier::Any,
            },
        }
    }

    /// `field <> ALL(values)`, i.e. `field NOT IN (...)`.
    pub fn all(field_name: impl Into<String>, operator: Operator, values: Vec<Value>) -> Self {
        Self {
            field_name: field_name.into(),
            operator,
            value: QualValue::List {
                values,
                quantifier: ListQuantifier::All,
            },
        }
    }

    /// Build a qualifier from the host's operator string.
    pub fn from_host(
        field_name: impl Into<String>,
        operator: &str,
        value: impl Into<Value>,
    ) -> Result<Self, UnsupportedOperatorError> {
        Ok(Self::new(field_name, Operator::parse(operator)?, value))
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            QualValue::Null => write!(f, "{} {} NULL", self.field_name, self.operator),
            QualValue::Scalar(v) => write!(f, "{} {} {}", self.field_name, self.operator, v),
            QualValue::List { values, quantifier } => {
                let list = values.iter().map(Value::to_string).collect::<Vec<_>>();
                let quantifier = match quantifier {
                    ListQuantifier::Any => "ANY",
                    ListQuantifier::All => "ALL",
                };
                write!(
                    f,
                    "{} {} {}({})",
                    self.field_name,
                    self.operator,
                    quantifier,
                    list.join(", ")
                )
            }
        }
    }
}

// =============================================================================
// Text form (`number > 1000`, `name ~~ 'A%'`, `year IN (2016, 2017)`)
// =============================================================================

/// Error parsing the text form of a qualifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QualParseError {
    #[error("invalid qualifier syntax: {0}")]
    InvalidSyntax(String),

    #[error(transparent)]
    UnsupportedOperator(#[from] UnsupportedOperatorError),
}

static QUAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*([A-Za-z_][A-Za-z0-9_]*)\s*(is\s+not|is|not\s+in|in|!~~|~~|<=|>=|<>|!=|=|<|>)\s*(.*?)\s*$",
    )
    .expect("valid qualifier regex")
});

impl FromStr for Qualifier {
    type Err = QualParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = QUAL_RE
            .captures(s)
            .ok_or_else(|| QualParseError::InvalidSyntax(s.to_string()))?;
        let field = caps[1].to_string();
        let op = caps[2].split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        let rhs = &caps[3];

        match op.as_str() {
            "IS" | "IS NOT" => {
                if !rhs.eq_ignore_ascii_case("null") {
                    return Err(QualParseError::InvalidSyntax(s.to_string()));
                }
                Ok(Qualifier {
                    field_name: field,
                    operator: Operator::parse(&op)?,
                    value: QualValue::Null,
                })
            }
            "IN" | "NOT IN" => {
                let inner = rhs
                    .strip_prefix('(')
                    .and_then(|r| r.strip_suffix(')'))
                    .ok_or_else(|| QualParseError::InvalidSyntax(s.to_string()))?;
                let values = split_list(inner).iter().map(|v| parse_value(v)).collect();
                Ok(if op == "IN" {
                    Qualifier::any(field, Operator::Eq, values)
                } else {
                    Qualifier::all(field, Operator::Ne, values)
                })
            }
            _ => {
                if rhs.is_empty() {
                    return Err(QualParseError::InvalidSyntax(s.to_string()));
                }
                Ok(Qualifier::new(field, Operator::parse(&op)?, parse_value(rhs)))
            }
        }
    }
}

/// Split a comma-separated list, ignoring commas inside quotes.
fn split_list(s: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in s.chars() {
        match (quote, ch) {
            (None, '\'' | '"') => {
                quote = Some(ch);
                current.push(ch);
            }
            (Some(q), c) if c == q => {
                quote = None;
                current.push(ch);
            }
            (None, ',') => items.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        items.push(current.trim().to_string());
    }
    items
}

fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    for q in ['\'', '"'] {
        if raw.len() >= 2 && raw.starts_with(q) && raw.ends_with(q) {
            let inner = &raw[1..raw.len() - 1];
            let doubled: String = [q, q].iter().collect();
            return Value::String(inner.replace(&doubled, &q.to_string()));
        }
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Int(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    Value::String(raw.to_string())
}
