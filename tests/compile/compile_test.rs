//! Integration tests for the scan → SQL compilation pipeline.
//!
//! The fixture is the public `usa_names.usa_1910_current` table declared the
//! way the host declares it: base type names plus OIDs.

use bqfdw::compile::{CompileError, QueryCompiler};
use bqfdw::config::FdwOptions;
use bqfdw::model::{ColumnDefinition, Operator, Qualifier, Value};
use bqfdw::sql::{validate_sql, Dialect, QueryParameter, WarehouseType};
use insta::assert_snapshot;

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

fn options() -> FdwOptions {
    FdwOptions::from_options(host_options()).unwrap()
}

fn usa_names() -> Vec<ColumnDefinition> {
    [
        ("state", 25, "text"),
        ("gender", 25, "text"),
        ("year", 20, "bigint"),
        ("name", 25, "text"),
        ("number", 20, "bigint"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, oid, ty))| ColumnDefinition::from_catalog(name, oid, ty, i).unwrap())
    .collect()
}

fn with_pseudo_columns() -> Vec<ColumnDefinition> {
    let mut columns = usa_names();
    columns.push(ColumnDefinition::from_catalog("_fdw_count", 20, "bigint", 5).unwrap());
    columns.push(ColumnDefinition::from_catalog("partition_date", 0, "date", 6).unwrap());
    columns
}

fn quals() -> Vec<Qualifier> {
    vec![
        Qualifier::new("number", Operator::Gt, 1000),
        Qualifier::new("year", Operator::Eq, 2017),
    ]
}

// ============================================================================
// Basic Compilation Tests
// ============================================================================

#[test]
fn test_build_query() {
    let options = options();
    let schema = usa_names();
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&quals(), Some(&schema))
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT state  as state, gender  as gender, year  as year, name  as name, number  as number FROM `bigquery-public-data.usa_names.usa_1910_current` WHERE number > @number AND year = @year");
    assert_eq!(
        compiled.parameters,
        vec![
            QueryParameter::new("number", WarehouseType::Int64, 1000),
            QueryParameter::new("year", WarehouseType::Int64, 2017),
        ]
    );
    assert!(compiled.skipped.is_empty());
    assert_eq!(compiled.dialect, Dialect::Standard);
    assert!(!compiled.sql.contains("GROUP BY"));
}

#[test]
fn test_build_query_grouped() {
    let mut options = options();
    options.set_option_group_by("true");
    let schema = usa_names();
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&quals(), Some(&schema))
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT state  as state, gender  as gender, year  as year, name  as name, number  as number FROM `bigquery-public-data.usa_names.usa_1910_current` WHERE number > @number AND year = @year GROUP BY state , gender , year , name , number");
    assert_eq!(compiled.parameters.len(), 2);
}

#[test]
fn test_grouped_count() {
    let mut options = options();
    options.set_option_group_by("true");
    let schema = with_pseudo_columns();
    let projection: Vec<_> = schema
        .iter()
        .filter(|c| c.name == "state" || c.name == "_fdw_count")
        .cloned()
        .collect();
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&[], Some(&projection))
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT state  as state, count(*)  as _fdw_count FROM `bigquery-public-data.usa_names.usa_1910_current` GROUP BY state");
    validate_sql(&compiled.sql, compiled.dialect).unwrap();
}

#[test]
fn test_grouped_star_has_no_group_by() {
    let mut options = options();
    options.set_option_group_by("true");
    let schema = usa_names();
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&[], None)
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT * FROM `bigquery-public-data.usa_names.usa_1910_current`");
}

#[test]
fn test_only_count_has_no_group_by() {
    let mut options = options();
    options.set_option_group_by("true");
    let schema = with_pseudo_columns();
    let projection = vec![schema[5].clone()];
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&[], Some(&projection))
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT count(*)  as _fdw_count FROM `bigquery-public-data.usa_names.usa_1910_current`");
}

// ============================================================================
// Dialect Tests
// ============================================================================

#[test]
fn test_legacy_dialect() {
    let mut options = options();
    options.set_option_sql_dialect(Some("legacy"));
    let schema = usa_names();
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&[], Some(&schema[..2]))
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT state  as state, gender  as gender FROM [bigquery-public-data:usa_names.usa_1910_current]");
    assert_eq!(compiled.dialect, Dialect::Legacy);
}

#[test]
fn test_legacy_cast_type_names() {
    let mut options = options();
    options.set_option_sql_dialect(Some("legacy"));
    options.set_option_casting(r#"{"year": "INT64", "number": "FLOAT64"}"#).unwrap();
    let schema = usa_names();
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&[], Some(&schema[2..]))
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT CAST(year as INTEGER)  as year, name  as name, CAST(number as FLOAT)  as number FROM [bigquery-public-data:usa_names.usa_1910_current]");
}

#[test]
fn test_unknown_dialect_falls_back_to_standard() {
    let mut options = options();
    options.set_option_sql_dialect(Some("ansi"));
    assert_eq!(options.dialect, Dialect::Standard);
}

// ============================================================================
// Qualifier Tests
// ============================================================================

#[test]
fn test_parameter_types_follow_columns() {
    let options = options();
    let schema = usa_names();
    let quals = vec![
        Qualifier::new("year", Operator::Eq, "2017"),
        Qualifier::new("name", Operator::Like, "Mar%"),
    ];
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&quals, None)
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT * FROM `bigquery-public-data.usa_names.usa_1910_current` WHERE year = @year AND name LIKE @name");
    assert_eq!(compiled.parameters[0].data_type, WarehouseType::Int64);
    assert_eq!(compiled.parameters[1].data_type, WarehouseType::String);
}

#[test]
fn test_partition_pruning() {
    let options = options();
    let schema = with_pseudo_columns();
    let quals = vec![
        Qualifier::new("partition_date", Operator::Ge, "2017-01-01"),
        Qualifier::new("partition_date", Operator::Lt, "2017-02-01"),
    ];
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&quals, Some(&schema[6..]))
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT _PARTITIONTIME  as partition_date FROM `bigquery-public-data.usa_names.usa_1910_current` WHERE _PARTITIONTIME >= @partition_date AND _PARTITIONTIME < @partition_date_1");
    assert!(compiled
        .parameters
        .iter()
        .all(|p| p.data_type == WarehouseType::Timestamp));
}

#[test]
fn test_lists_and_nulls() {
    let options = options();
    let schema = usa_names();
    let quals = vec![
        Qualifier::any("state", Operator::Eq, vec!["CA".into(), "NY".into()]),
        Qualifier::all("gender", Operator::Ne, vec!["F".into()]),
        Qualifier::new("name", Operator::Ne, Value::Null),
    ];
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&quals, None)
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT * FROM `bigquery-public-data.usa_names.usa_1910_current` WHERE state IN (@state, @state_1) AND gender NOT IN (@gender) AND name IS NOT NULL");
    assert_eq!(compiled.parameters.len(), 3);
}

#[test]
fn test_skipped_qualifiers_widen_the_scan() {
    let options = options();
    let schema = with_pseudo_columns();
    let quals = vec![
        Qualifier::new("_fdw_count", Operator::Gt, 10),
        Qualifier::new("number", Operator::Gt, Value::Null),
    ];
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&quals, None)
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT * FROM `bigquery-public-data.usa_names.usa_1910_current`");
    assert_eq!(compiled.skipped.len(), 2);
    assert!(compiled.parameters.is_empty());
}

#[test]
fn test_unknown_qualifier_column_fails() {
    let options = options();
    let schema = usa_names();
    let err = QueryCompiler::new(&options, &schema)
        .build_query(&[Qualifier::new("county", Operator::Eq, "Kings")], None)
        .unwrap_err();
    assert_eq!(err, CompileError::UnknownColumn("county".into()));
}

#[test]
fn test_text_qualifiers() {
    let options = options();
    let schema = usa_names();
    let quals: Vec<Qualifier> = ["number > 1000", "name ~~ 'Mar%'", "state IS NULL", "year IN (2016, 2017)"]
        .iter()
        .map(|q| q.parse().unwrap())
        .collect();
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&quals, None)
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT * FROM `bigquery-public-data.usa_names.usa_1910_current` WHERE number > @number AND name LIKE @name AND state IS NULL AND year IN (@year, @year_1)");
    assert_eq!(
        compiled.parameters[1],
        QueryParameter::new("name", WarehouseType::String, "Mar%")
    );
}

// ============================================================================
// Determinism and Validation
// ============================================================================

#[test]
fn test_compilation_is_deterministic() {
    let options = options();
    let schema = usa_names();
    let compiler = QueryCompiler::new(&options, &schema);

    let first = compiler.build_query(&quals(), Some(&schema)).unwrap();
    let second = compiler.build_query(&quals(), Some(&schema)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn test_fingerprint_differs_by_dialect() {
    let standard = options();
    let mut legacy = options();
    legacy.set_option_sql_dialect(Some("legacy"));
    let schema = usa_names();

    let a = QueryCompiler::new(&standard, &schema).build_query(&[], None).unwrap();
    let b = QueryCompiler::new(&legacy, &schema).build_query(&[], None).unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn test_standard_output_parses() {
    let mut options = options();
    options.set_option_group_by("true");
    options.set_option_casting(r#"{"number": "STRING"}"#).unwrap();
    let schema = with_pseudo_columns();
    let quals = vec![Qualifier::new("state", Operator::Eq, Value::Null)];
    let compiled = QueryCompiler::new(&options, &schema)
        .build_query(&quals, Some(&schema))
        .unwrap();

    assert_snapshot!(compiled.sql, @"SELECT state  as state, gender  as gender, year  as year, name  as name, CAST(number as STRING)  as number, count(*)  as _fdw_count, _PARTITIONTIME  as partition_date FROM `bigquery-public-data.usa_names.usa_1910_current` WHERE state IS NULL GROUP BY state , gender , year , name , CAST(number as STRING) , _PARTITIONTIME");
    validate_sql(&compiled.sql, compiled.dialect).unwrap();
}
