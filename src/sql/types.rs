//! Type catalog: relational column types and their BigQuery equivalents.
//!
//! The foreign table declares PostgreSQL types; BigQuery speaks its own type
//! names, spelled differently in standard and legacy SQL. This module is the
//! single place where the two meet:
//!
//! | PostgreSQL                  | Standard   | Legacy     |
//! |-----------------------------|------------|------------|
//! | `boolean`                   | `BOOL`     | `BOOLEAN`  |
//! | `smallint/integer/bigint`   | `INT64`    | `INTEGER`  |
//! | `real/double precision`     | `FLOAT64`  | `FLOAT`    |
//! | `numeric`                   | `NUMERIC`  | `NUMERIC`  |
//! | `text/varchar/char`         | `STRING`   | `STRING`   |
//! | `bytea`                     | `BYTES`    | `BYTES`    |
//! | `date`                      | `DATE`     | `DATE`     |
//! | `time`                      | `TIME`     | `TIME`     |
//! | `timestamp`                 | `DATETIME` | `DATETIME` |
//! | `timestamptz`               | `TIMESTAMP`| `TIMESTAMP`|

use std::fmt;

use serde::{Deserialize, Serialize};

use super::dialect::Dialect;

/// A relational type outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported relational type: {0}")]
pub struct UnsupportedTypeError(pub String);

/// Relational (PostgreSQL) column types a foreign table may declare.
///
/// Adding a variant forces the warehouse mapping below to be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationalType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Real,
    DoublePrecision,
    Numeric,
    Text,
    Varchar,
    Char,
    Bytea,
    Date,
    Time,
    Timestamp,
    TimestampTz,
}

impl RelationalType {
    /// Every supported relational type, in OID order.
    pub const ALL: [RelationalType; 15] = [
        RelationalType::Boolean,
        RelationalType::Bytea,
        RelationalType::BigInt,
        RelationalType::SmallInt,
        RelationalType::Integer,
        RelationalType::Text,
        RelationalType::Real,
        RelationalType::DoublePrecision,
        RelationalType::Char,
        RelationalType::Varchar,
        RelationalType::Date,
        RelationalType::Time,
        RelationalType::Timestamp,
        RelationalType::TimestampTz,
        RelationalType::Numeric,
    ];

    /// PostgreSQL type OID.
    pub fn oid(self) -> u32 {
        match self {
            RelationalType::Boolean => 16,
            RelationalType::Bytea => 17,
            RelationalType::BigInt => 20,
            RelationalType::SmallInt => 21,
            RelationalType::Integer => 23,
            RelationalType::Text => 25,
            RelationalType::Real => 700,
            RelationalType::DoublePrecision => 701,
            RelationalType::Char => 1042,
            RelationalType::Varchar => 1043,
            RelationalType::Date => 1082,
            RelationalType::Time => 1083,
            RelationalType::Timestamp => 1114,
            RelationalType::TimestampTz => 1184,
            RelationalType::Numeric => 1700,
        }
    }

    /// Canonical PostgreSQL base type name.
    pub fn base_type_name(self) -> &'static str {
        match self {
            RelationalType::Boolean => "boolean",
            RelationalType::SmallInt => "smallint",
            RelationalType::Integer => "integer",
            RelationalType::BigInt => "bigint",
            RelationalType::Real => "real",
            RelationalType::DoublePrecision => "double precision",
            RelationalType::Numeric => "numeric",
            RelationalType::Text => "text",
            RelationalType::Varchar => "character varying",
            RelationalType::Char => "character",
            RelationalType::Bytea => "bytea",
            RelationalType::Date => "date",
            RelationalType::Time => "time without time zone",
            RelationalType::Timestamp => "timestamp without time zone",
            RelationalType::TimestampTz => "timestamp with time zone",
        }
    }

    /// Look a type up by OID.
    pub fn from_oid(oid: u32) -> Result<Self, UnsupportedTypeError> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.oid() == oid)
            .ok_or_else(|| UnsupportedTypeError(format!("oid {oid}")))
    }

    /// Parse a base type name.
    ///
    /// Accepts the usual aliases (`int8`, `varchar`, `timestamptz`, ...) and
    /// ignores type modifiers, so `character varying(255)` is `Varchar`.
    pub fn parse(name: &str) -> Result<Self, UnsupportedTypeError> {
        let base = name.split('(').next().unwrap_or(name).trim().to_lowercase();
        let ty = match base.as_str() {
            "boolean" | "bool" => RelationalType::Boolean,
            "smallint" | "int2" => RelationalType::SmallInt,
            "integer" | "int" | "int4" => RelationalType::Integer,
            "bigint" | "int8" => RelationalType::BigInt,
            "real" | "float4" => RelationalType::Real,
            "double precision" | "float8" => RelationalType::DoublePrecision,
            "numeric" | "decimal" => RelationalType::Numeric,
            "text" => RelationalType::Text,
            "character varying" | "varchar" => RelationalType::Varchar,
            "character" | "char" | "bpchar" => RelationalType::Char,
            "bytea" => RelationalType::Bytea,
            "date" => RelationalType::Date,
            "time" | "time without time zone" => RelationalType::Time,
            "timestamp" | "timestamp without time zone" => RelationalType::Timestamp,
            "timestamptz" | "timestamp with time zone" => RelationalType::TimestampTz,
            _ => return Err(UnsupportedTypeError(name.to_string())),
        };
        Ok(ty)
    }

    /// Resolve the type the host reported for a column.
    ///
    /// The base type name wins; the host sends OID 0 for some columns.
    pub fn resolve(oid: u32, base_type_name: &str) -> Result<Self, UnsupportedTypeError> {
        Self::parse(base_type_name).or_else(|_| {
            Self::from_oid(oid).map_err(|_| {
                UnsupportedTypeError(format!("{base_type_name} (oid {oid})"))
            })
        })
    }

    /// The BigQuery type this relational type maps to.
    pub fn warehouse_type(self) -> WarehouseType {
        match self {
            RelationalType::Boolean => WarehouseType::Bool,
            RelationalType::SmallInt | RelationalType::Integer | RelationalType::BigInt => {
                WarehouseType::Int64
            }
            RelationalType::Real | RelationalType::DoublePrecision => WarehouseType::Float64,
            RelationalType::Numeric => WarehouseType::Numeric,
            RelationalType::Text | RelationalType::Varchar | RelationalType::Char => {
                WarehouseType::String
            }
            RelationalType::Bytea => WarehouseType::Bytes,
            RelationalType::Date => WarehouseType::Date,
            RelationalType::Time => WarehouseType::Time,
            RelationalType::Timestamp => WarehouseType::Datetime,
            RelationalType::TimestampTz => WarehouseType::Timestamp,
        }
    }
}

impl fmt::Display for RelationalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_type_name())
    }
}

/// BigQuery scalar types.
///
/// Serializes with the standard SQL spelling, the one query parameters use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WarehouseType {
    Int64,
    Float64,
    Numeric,
    Bool,
    String,
    Bytes,
    Date,
    Datetime,
    Time,
    Timestamp,
}

impl WarehouseType {
    pub const ALL: [WarehouseType; 10] = [
        WarehouseType::Int64,
        WarehouseType::Float64,
        WarehouseType::Numeric,
        WarehouseType::Bool,
        WarehouseType::String,
        WarehouseType::Bytes,
        WarehouseType::Date,
        WarehouseType::Datetime,
        WarehouseType::Time,
        WarehouseType::Timestamp,
    ];

    /// Type name as spelled by the given dialect.
    pub fn name(self, dialect: Dialect) -> &'static str {
        match dialect {
            Dialect::Standard => self.standard_name(),
            Dialect::Legacy => self.legacy_name(),
        }
    }

    pub fn standard_name(self) -> &'static str {
        match self {
            WarehouseType::Int64 => "INT64",
            WarehouseType::Float64 => "FLOAT64",
            WarehouseType::Numeric => "NUMERIC",
            WarehouseType::Bool => "BOOL",
            WarehouseType::String => "STRING",
            WarehouseType::Bytes => "BYTES",
            WarehouseType::Date => "DATE",
            WarehouseType::Datetime => "DATETIME",
            WarehouseType::Time => "TIME",
            WarehouseType::Timestamp => "TIMESTAMP",
        }
    }

    pub fn legacy_name(self) -> &'static str {
        match self {
            WarehouseType::Int64 => "INTEGER",
            WarehouseType::Float64 => "FLOAT",
            WarehouseType::Bool => "BOOLEAN",
            other => other.standard_name(),
        }
    }

    /// Parse a BigQuery type name in either dialect's spelling.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_uppercase().as_str() {
            "INT64" | "INTEGER" | "INT" => Some(WarehouseType::Int64),
            "FLOAT64" | "FLOAT" => Some(WarehouseType::Float64),
            "NUMERIC" | "DECIMAL" => Some(WarehouseType::Numeric),
            "BOOL" | "BOOLEAN" => Some(WarehouseType::Bool),
            "STRING" => Some(WarehouseType::String),
            "BYTES" => Some(WarehouseType::Bytes),
            "DATE" => Some(WarehouseType::Date),
            "DATETIME" => Some(WarehouseType::Datetime),
            "TIME" => Some(WarehouseType::Time),
            "TIMESTAMP" => Some(WarehouseType::Timestamp),
            _ => None,
        }
    }

    /// Whether BigQuery permits `CAST(<self> AS <target>)`.
    pub fn can_cast_to(self, target: WarehouseType) -> bool {
        use WarehouseType::*;
        match self {
            Int64 => matches!(target, Bool | Int64 | Numeric | Float64 | String),
            Numeric | Float64 => matches!(target, Int64 | Numeric | Float64 | String),
            Bool => matches!(target, Bool | Int64 | String),
            String => true,
            Bytes => matches!(target, Bytes | String),
            Date => matches!(target, Date | Datetime | String | Timestamp),
            Datetime | Timestamp => matches!(target, Date | Datetime | String | Time | Timestamp),
            Time => matches!(target, String | Time),
        }
    }
}

impl fmt::Display for WarehouseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.standard_name())
    }
}

/// One row of the static type mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeMapping {
    pub relational: RelationalType,
    pub standard: &'static str,
    pub legacy: &'static str,
}

/// The full mapping table, one row per supported relational type.
pub fn type_mappings() -> Vec<TypeMapping> {
    RelationalType::ALL
        .into_iter()
        .map(|relational| {
            let ty = relational.warehouse_type();
            TypeMapping {
                relational,
                standard: ty.standard_name(),
                legacy: ty.legacy_name(),
            }
        })
        .collect()
}

/// Resolve the warehouse type name for a relational type.
pub fn resolve_type(relational: RelationalType, dialect: Dialect) -> &'static str {
    relational.warehouse_type().name(dialect)
}

/// Resolve the warehouse type name for a relational base type name.
pub fn resolve_type_name(name: &str, dialect: Dialect) -> Result<&'static str, UnsupportedTypeError> {
    RelationalType::parse(name).map(|ty| resolve_type(ty, dialect))
}

/// A permitted-conversions row: every target a source type may be cast to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRule {
    pub from: WarehouseType,
    pub to: Vec<WarehouseType>,
}

/// BigQuery's standard SQL conversion rules.
pub fn conversion_rules() -> Vec<ConversionRule> {
    WarehouseType::ALL
        .into_iter()
        .map(|from| ConversionRule {
            from,
            to: WarehouseType::ALL
                .into_iter()
                .filter(|to| from.can_cast_to(*to))
                .collect(),
        })
        .collect()
}
