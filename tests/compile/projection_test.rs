//! Column-list construction for the SELECT and GROUP BY clauses.

use bqfdw::config::FdwOptions;
use bqfdw::model::ColumnDefinition;
use bqfdw::sql::Dialect;
use bqfdw::translation::{ColumnListBuilder, ProjectionMode};

fn options() -> FdwOptions {
    FdwOptions::from_options([
        ("fdw_dataset", "bigquery-public-data.usa_names"),
        ("fdw_table", "usa_1910_current"),
        ("fdw_group", "false"),
        ("fdw_casting", "false"),
    ])
    .unwrap()
}

fn columns() -> Vec<ColumnDefinition> {
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

fn push(columns: &mut Vec<ColumnDefinition>, name: &str, oid: u32, ty: &str) {
    let ordinal = columns.len();
    columns.push(ColumnDefinition::from_catalog(name, oid, ty, ordinal).unwrap());
}

#[test]
fn test_select_list() {
    let options = options();
    let builder = ColumnListBuilder::from_options(&options);
    assert_eq!(
        builder.build_column_list(Some(&columns()), ProjectionMode::Select),
        "state  as state, gender  as gender, year  as year, name  as name, number  as number"
    );
}

#[test]
fn test_group_by_list() {
    let options = options();
    let builder = ColumnListBuilder::from_options(&options);
    assert_eq!(
        builder.build_column_list(Some(&columns()), ProjectionMode::GroupBy),
        "state , gender , year , name , number"
    );
}

#[test]
fn test_count_pseudo_column() {
    let options = options();
    let builder = ColumnListBuilder::from_options(&options);
    let mut c = columns();
    push(&mut c, "_fdw_count", 20, "bigint");

    assert_eq!(
        builder.build_column_list(Some(&c), ProjectionMode::Select),
        "state  as state, gender  as gender, year  as year, name  as name, number  as number, count(*)  as _fdw_count"
    );
    assert_eq!(
        builder.build_column_list(Some(&c), ProjectionMode::GroupBy),
        "state , gender , year , name , number"
    );
}

#[test]
fn test_partition_pseudo_column() {
    let options = options();
    let builder = ColumnListBuilder::from_options(&options);
    let mut c = columns();
    push(&mut c, "partition_date", 0, "date");

    assert_eq!(
        builder.build_column_list(Some(&c), ProjectionMode::Select),
        "state  as state, gender  as gender, year  as year, name  as name, number  as number, _PARTITIONTIME  as partition_date"
    );
    assert_eq!(
        builder.build_column_list(Some(&c), ProjectionMode::GroupBy),
        "state , gender , year , name , number , _PARTITIONTIME"
    );
}

#[test]
fn test_no_columns() {
    let options = options();
    let builder = ColumnListBuilder::from_options(&options);
    assert_eq!(builder.build_column_list(None, ProjectionMode::Select), "*");
    assert_eq!(builder.build_column_list(None, ProjectionMode::GroupBy), "");
}

#[test]
fn test_casting_option() {
    let mut options = options();
    options.set_option_casting(r#"{"number": "STRING"}"#).unwrap();
    let builder = ColumnListBuilder::from_options(&options);
    let c = columns();

    assert_eq!(
        builder.build_column_list(Some(&c[2..]), ProjectionMode::Select),
        "year  as year, name  as name, CAST(number as STRING)  as number"
    );
}

#[test]
fn test_time_zone_option() {
    let mut options = options();
    options.set_option_time_zone("US/Eastern").unwrap();
    let builder = ColumnListBuilder::from_options(&options);
    let mut c = Vec::new();
    push(&mut c, "birth_date", 1082, "date");
    push(&mut c, "seen_at", 1114, "timestamp without time zone");
    push(&mut c, "loaded_at", 1184, "timestamp with time zone");

    assert_eq!(
        builder.build_column_list(Some(&c), ProjectionMode::Select),
        r#"DATE(birth_date, "US/Eastern")  as birth_date, DATETIME(seen_at, "US/Eastern")  as seen_at, loaded_at  as loaded_at"#
    );
}

#[test]
fn test_quoted_identifiers() {
    let mut c = Vec::new();
    push(&mut c, "first name", 25, "text");
    push(&mut c, "select", 25, "text");

    let builder = ColumnListBuilder::new(Dialect::Standard);
    assert_eq!(
        builder.build_column_list(Some(&c), ProjectionMode::Select),
        "`first name`  as `first name`, `select`  as `select`"
    );

    let builder = ColumnListBuilder::new(Dialect::Legacy);
    assert_eq!(
        builder.build_column_list(Some(&c), ProjectionMode::GroupBy),
        "[first name] , [select]"
    );
}

#[test]
fn test_add_column_alias() {
    let builder = ColumnListBuilder::new(Dialect::Standard);
    assert_eq!(builder.add_column_alias("some_column", true), " as some_column");
    assert_eq!(builder.add_column_alias("some_column", false), "");
}
