//! Option parsing at the host boundary and from TOML table files.

use std::path::PathBuf;

use bqfdw::config::{ConfigError, FdwOptions, TableConfig};
use bqfdw::model::ColumnKind;
use bqfdw::sql::{Dialect, RelationalType, WarehouseType};

fn host_options() -> Vec<(&'static str, &'static str)> {
    vec![
        ("fdw_key", "/opt/key/key.json"),
        ("fdw_dataset", "bigquery-public-data.usa_names"),
        ("fdw_table", "usa_1910_current"),
        ("fdw_verbose", "False"),
        ("fdw_sql_dialect", "standard"),
        ("fdw_group", "false"),
        ("fdw_casting", "false"),
    ]
}

#[test]
fn test_from_host_options() {
    let options = FdwOptions::from_options(host_options()).unwrap();
    assert_eq!(options.key, Some(PathBuf::from("/opt/key/key.json")));
    assert_eq!(options.dataset, "bigquery-public-data.usa_names");
    assert_eq!(options.table, "usa_1910_current");
    assert!(!options.verbose);
    assert_eq!(options.dialect, Dialect::Standard);
    assert!(!options.group_by);
    assert!(options.casting.is_empty());
    assert!(options.time_zone.is_none());
    assert_eq!(options.max_rows, None);
}

#[test]
fn test_unprefixed_keys() {
    let options = FdwOptions::from_options([
        ("dataset", "ds"),
        ("table", "t"),
        ("sql_dialect", "legacy"),
        ("tz", "US/Eastern"),
        ("unknown", "ignored"),
    ])
    .unwrap();
    assert_eq!(options.dialect, Dialect::Legacy);
    assert_eq!(options.time_zone.unwrap().as_str(), "US/Eastern");
}

#[test]
fn test_set_option_sql_dialect() {
    let mut options = FdwOptions::from_options(host_options()).unwrap();

    options.set_option_sql_dialect(Some("legacy"));
    assert_eq!(options.dialect, Dialect::Legacy);

    options.set_option_sql_dialect(Some("standard"));
    assert_eq!(options.dialect, Dialect::Standard);

    options.set_option_sql_dialect(Some("non_existing"));
    assert_eq!(options.dialect, Dialect::Standard);

    options.set_option_sql_dialect(None);
    assert_eq!(options.dialect, Dialect::Standard);
}

#[test]
fn test_set_option_group_by() {
    let mut options = FdwOptions::from_options(host_options()).unwrap();
    options.set_option_group_by("true");
    assert!(options.group_by);
    options.set_option_group_by("false");
    assert!(!options.group_by);
}

#[test]
fn test_set_option_verbose() {
    let mut options = FdwOptions::from_options(host_options()).unwrap();
    options.set_option_verbose("true");
    assert!(options.verbose);
    options.set_option_verbose("false");
    assert!(!options.verbose);
}

#[test]
fn test_set_option_casting() {
    let mut options = FdwOptions::from_options(host_options()).unwrap();
    options
        .set_option_casting(r#"{"column1": "STRING", "column2": "DATE", "column3": "TIMESTAMP"}"#)
        .unwrap();
    let rules: Vec<_> = options.casting.iter().collect();
    assert_eq!(
        rules,
        vec![
            ("column1", WarehouseType::String),
            ("column2", WarehouseType::Date),
            ("column3", WarehouseType::Timestamp),
        ]
    );

    options.set_option_casting("").unwrap();
    assert!(options.casting.is_empty());
}

#[test]
fn test_invalid_options() {
    let mut options = FdwOptions::from_options(host_options()).unwrap();
    assert!(matches!(
        options.set_option_casting(r#"{"number": "TEXT"}"#),
        Err(ConfigError::InvalidCastType { .. })
    ));
    assert!(matches!(
        options.set_option_time_zone("US/Eastern\""),
        Err(ConfigError::InvalidTimeZone(_))
    ));
}

#[test]
fn test_table_config_file() {
    let path = std::env::temp_dir().join(format!("bqfdw_options_test_{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
[options]
dataset = "bigquery-public-data.usa_names"
table = "usa_1910_current"
sql_dialect = "legacy"
verbose = true

[[columns]]
name = "name"
type = "character varying(64)"

[[columns]]
name = "_fdw_count"
type = "bigint"

[[columns]]
name = "partition_date"
type = "date"
oid = 0
"#,
    )
    .unwrap();

    let config = TableConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let options = config.fdw_options().unwrap();
    assert_eq!(options.dialect, Dialect::Legacy);
    assert!(options.verbose);

    let columns = config.column_definitions().unwrap();
    assert_eq!(columns[0].relational_type, RelationalType::Varchar);
    assert_eq!(columns[1].kind, ColumnKind::CountAggregate);
    assert_eq!(columns[2].kind, ColumnKind::PartitionTime);
}

#[test]
fn test_table_config_requires_dataset() {
    let config = TableConfig::from_toml_str(
        r#"
[options]
table = "usa_1910_current"
"#,
    )
    .unwrap();
    assert!(matches!(
        config.fdw_options(),
        Err(ConfigError::MissingOption("dataset"))
    ));
}
