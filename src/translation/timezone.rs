//! Timezone normalization of date and datetime columns.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ConfigError;
use crate::sql::expr::{func, Expr};
use crate::sql::types::WarehouseType;

static TZ_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_+\-/]+$").expect("valid timezone regex"));

/// A validated IANA-style timezone name (`US/Eastern`, `Etc/GMT+5`, `UTC`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeZone(String);

impl TimeZone {
    /// Validate a timezone name.
    ///
    /// The name ends up inside a string literal, so only letters, digits
    /// and `_ + - /` are accepted.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        let name = name.trim();
        if name.len() > 64 || !TZ_NAME.is_match(name) {
            return Err(ConfigError::InvalidTimeZone(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convert DATE and DATETIME columns into `tz`.
///
/// Other types, and any column when no timezone is configured, are returned
/// unchanged.
pub fn set_time_zone(expr: Expr, ty: WarehouseType, tz: Option<&TimeZone>) -> Expr {
    let Some(tz) = tz else {
        return expr;
    };
    let name = match ty {
        WarehouseType::Date => "DATE",
        WarehouseType::Datetime => "DATETIME",
        _ => return expr,
    };
    func(name, vec![expr, Expr::LitString(tz.as_str().to_string())])
}
