//! TOML table definitions for running the wrapper outside a host.
//!
//! A table file carries the options the host would pass plus the column
//! list of the foreign table:
//!
//! ```toml
//! [options]
//! key = "${HOME}/.config/gcloud/key.json"
//! dataset = "bigquery-public-data.usa_names"
//! table = "usa_1910_current"
//! group = true
//! casting = { number = "STRING" }
//!
//! [[columns]]
//! name = "state"
//! type = "text"
//!
//! [[columns]]
//! name = "number"
//! type = "bigint"
//! ```
//!
//! String values support `${VAR}` and `$VAR` environment expansion.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::options::FdwOptions;
use super::ConfigError;
use crate::model::ColumnDefinition;

/// A foreign table definition loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TableConfig {
    /// Wrapper options, keyed as the host would key them.
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,

    /// Columns in declaration order.
    #[serde(default)]
    pub columns: Vec<ColumnSettings>,
}

/// One declared column.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnSettings {
    pub name: String,

    /// Base type name as the host reports it (`text`, `bigint`, `varchar(40)`).
    #[serde(rename = "type")]
    pub type_name: String,

    /// Type OID, for hosts that report one.
    #[serde(default)]
    pub oid: Option<u32>,
}

impl TableConfig {
    /// Load a table definition from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Options flattened to the host's string form.
    ///
    /// Inline tables and arrays are rendered as JSON so `casting` can be
    /// written natively in TOML.
    pub fn option_strings(&self) -> Result<Vec<(String, String)>, ConfigError> {
        self.options
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    toml::Value::String(s) => expand_env_vars(s)?,
                    toml::Value::Table(_) | toml::Value::Array(_) => serde_json::to_string(value)
                        .map_err(|e| ConfigError::InvalidOption {
                            name: key.clone(),
                            value: e.to_string(),
                        })?,
                    other => other.to_string(),
                };
                Ok((key.clone(), rendered))
            })
            .collect()
    }

    /// Parse the options section.
    pub fn fdw_options(&self) -> Result<FdwOptions, ConfigError> {
        FdwOptions::from_options(self.option_strings()?)
    }

    /// Resolve the declared columns.
    pub fn column_definitions(&self) -> Result<Vec<ColumnDefinition>, ConfigError> {
        self.columns
            .iter()
            .enumerate()
            .map(|(ordinal, c)| {
                ColumnDefinition::from_catalog(&c.name, c.oid.unwrap_or(0), &c.type_name, ordinal)
                    .map_err(ConfigError::from)
            })
            .collect()
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        } else if !chars
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphabetic() || *ch == '_')
        {
            // `$5`, `$$` and a trailing `$` are literal
            result.push('$');
            continue;
        }

        let mut var_name = String::new();
        while let Some(&ch) = chars.peek() {
            if braced {
                chars.next();
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            } else if ch.is_ascii_alphanumeric() || ch == '_' {
                var_name.push(ch);
                chars.next();
            } else {
                break;
            }
        }

        if var_name.is_empty() {
            result.push('$');
            continue;
        }

        let value = env::var(&var_name).map_err(|_| ConfigError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
