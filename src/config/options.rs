//! Wrapper options, parsed once from the host's string-keyed map.
//!
//! Recognized keys (an `fdw_` prefix is accepted on every key):
//!
//! | Key | Meaning | Default |
//! |-----|---------|---------|
//! | `key` | service account key file | none |
//! | `dataset` | `[project.]dataset` path | required |
//! | `table` | table name | required |
//! | `verbose` | log compiled queries at info | `false` |
//! | `sql_dialect` | `standard` or `legacy` | `standard` |
//! | `group` | add a GROUP BY over the projection | `false` |
//! | `casting` | JSON column to type overrides | none |
//! | `tz` | timezone for DATE/DATETIME columns | none |
//! | `max_rows` | row cap for the command-line client | client default |

use std::path::PathBuf;

use tracing::warn;

use super::casting::CastingRules;
use super::ConfigError;
use crate::sql::dialect::Dialect;
use crate::translation::timezone::TimeZone;

const OPTION_PREFIX: &str = "fdw_";

/// Typed wrapper options.
#[derive(Debug, Clone, PartialEq)]
pub struct FdwOptions {
    pub key: Option<PathBuf>,
    pub dataset: String,
    pub table: String,
    pub verbose: bool,
    pub dialect: Dialect,
    pub group_by: bool,
    pub casting: CastingRules,
    pub time_zone: Option<TimeZone>,
    pub max_rows: Option<u64>,
}

impl FdwOptions {
    /// Options for `dataset.table` with every other setting at its default.
    pub fn new(dataset: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            key: None,
            dataset: dataset.into(),
            table: table.into(),
            verbose: false,
            dialect: Dialect::default(),
            group_by: false,
            casting: CastingRules::new(),
            time_zone: None,
            max_rows: None,
        }
    }

    /// Parse the host's option map.
    ///
    /// Unknown keys are ignored with a warning. `dataset` and `table` are
    /// required.
    pub fn from_options<I, K, V>(options: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::new(String::new(), String::new());
        let mut dataset = None;
        let mut table = None;

        for (key, value) in options {
            let key = key.as_ref();
            let value = value.as_ref();
            let name = key.strip_prefix(OPTION_PREFIX).unwrap_or(key);

            match name {
                "key" => opts.key = (!value.is_empty()).then(|| PathBuf::from(value)),
                "dataset" => dataset = Some(value.to_string()),
                "table" => table = Some(value.to_string()),
                "verbose" => opts.set_option_verbose(value),
                "sql_dialect" => opts.set_option_sql_dialect(Some(value)),
                "group" => opts.set_option_group_by(value),
                "casting" => opts.set_option_casting(value)?,
                "tz" => opts.set_option_time_zone(value)?,
                "max_rows" => {
                    let rows = value.trim().parse().map_err(|_| ConfigError::InvalidOption {
                        name: "max_rows".into(),
                        value: value.to_string(),
                    })?;
                    opts.max_rows = Some(rows);
                }
                other => warn!(option = other, "ignoring unknown option"),
            }
        }

        opts.dataset = required("dataset", dataset)?;
        opts.table = required("table", table)?;
        Ok(opts)
    }

    pub fn set_option_sql_dialect(&mut self, value: Option<&str>) {
        self.dialect = Dialect::parse(value);
    }

    pub fn set_option_group_by(&mut self, value: &str) {
        self.group_by = parse_bool("group", value);
    }

    pub fn set_option_verbose(&mut self, value: &str) {
        self.verbose = parse_bool("verbose", value);
    }

    /// Replace the casting rules. Empty input leaves no rules.
    pub fn set_option_casting(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.casting = CastingRules::parse(raw)?;
        Ok(())
    }

    /// Set the timezone. Empty input clears it.
    pub fn set_option_time_zone(&mut self, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        self.time_zone = if value.is_empty() {
            None
        } else {
            Some(TimeZone::parse(value)?)
        };
        Ok(())
    }
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingOption(name)),
    }
}

/// Lenient boolean: anything unrecognized is `false`.
pub fn parse_bool(name: &str, value: &str) -> bool {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" | "" => false,
        other => {
            warn!(option = name, value = other, "unrecognized boolean, using false");
            false
        }
    }
}
