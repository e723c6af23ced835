//! Configuration module.
//!
//! Handles the wrapper's string-keyed options, per-column casting rules and
//! TOML table definitions.

mod casting;
mod options;
mod settings;

use std::path::PathBuf;

pub use casting::CastingRules;
pub use options::{parse_bool, FdwOptions};
pub use settings::{expand_env_vars, ColumnSettings, TableConfig};

use crate::sql::types::UnsupportedTypeError;

/// Error type for configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required option: {0}")]
    MissingOption(&'static str),

    #[error("Invalid value for option {name}: {value}")]
    InvalidOption { name: String, value: String },

    #[error("Invalid cast type for column {column}: {value}")]
    InvalidCastType { column: String, value: String },

    #[error("Invalid timezone name: {0}")]
    InvalidTimeZone(String),

    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}
