//! Scan execution against an in-memory warehouse client.

use std::cell::Cell;

use bqfdw::client::{ClientResult, MemoryClient};
use bqfdw::config::FdwOptions;
use bqfdw::execute::{ExecuteError, ForeignTable};
use bqfdw::model::{columns, ColumnDefinition, Operator, Qualifier, Row, Value};
use bqfdw::sql::{Dialect, RelationalType, WarehouseType};

fn schema() -> Vec<ColumnDefinition> {
    columns([
        ("state", RelationalType::Text),
        ("gender", RelationalType::Text),
        ("year", RelationalType::BigInt),
        ("name", RelationalType::Text),
        ("number", RelationalType::BigInt),
    ])
}

/// Rows as `bq --format=json` returns them: every value a string.
fn bq_rows() -> Vec<Row> {
    vec![
        [
            ("state", "TX"),
            ("gender", "F"),
            ("year", "2017"),
            ("name", "Emma"),
            ("number", "1118"),
        ]
        .into_iter()
        .collect(),
        [
            ("state", "CA"),
            ("gender", "M"),
            ("year", "2017"),
            ("name", "Noah"),
            ("number", "2511"),
        ]
        .into_iter()
        .collect(),
    ]
}

/// The warehouse's answer to a projection of `keys`, in that column order.
fn projected_rows(keys: &[&str]) -> Vec<Row> {
    bq_rows()
        .into_iter()
        .map(|row| {
            keys.iter()
                .map(|k| (*k, row.get(k).cloned().unwrap_or(Value::Null)))
                .collect()
        })
        .collect()
}

fn options() -> FdwOptions {
    FdwOptions::new("bigquery-public-data.usa_names", "usa_1910_current")
}

fn quals() -> Vec<Qualifier> {
    vec![
        Qualifier::new("number", Operator::Gt, 1000),
        Qualifier::new("year", Operator::Eq, 2017),
    ]
}

#[test]
fn test_execute_reshapes_rows() {
    // physical order differs from the requested order
    let connector = |_: &FdwOptions| -> ClientResult<MemoryClient> {
        Ok(MemoryClient::new(projected_rows(&["year", "name", "number"])))
    };
    let table = ForeignTable::new(options(), schema(), connector);

    let rows: Vec<Row> = table
        .execute(&quals(), &["number", "name", "year"])
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["number", "name", "year"]);
    }
    assert_eq!(rows[0].get("number"), Some(&Value::Int(1118)));
    assert_eq!(rows[0].get("name"), Some(&Value::from("Emma")));
    assert_eq!(rows[1].get("year"), Some(&Value::Int(2017)));
}

#[test]
fn test_execute_keeps_caller_order_for_every_permutation() {
    let requested = ["name", "state", "number"];
    for physical in [
        ["state", "name", "number"],
        ["number", "state", "name"],
        ["name", "state", "number"],
    ] {
        let connector = move |_: &FdwOptions| -> ClientResult<MemoryClient> {
            Ok(MemoryClient::new(projected_rows(&physical)))
        };
        let table = ForeignTable::new(options(), schema(), connector);
        for row in table.execute(&[], &requested).unwrap() {
            let row = row.unwrap();
            assert_eq!(row.keys().collect::<Vec<_>>(), requested);
        }
    }
}

#[test]
fn test_execute_wildcard_rejects_nothing() {
    let connector = |_: &FdwOptions| -> ClientResult<MemoryClient> { Ok(MemoryClient::new(bq_rows())) };
    let table = ForeignTable::new(options(), schema(), connector);

    let requested: Vec<String> = Vec::new();
    let rows: Vec<Row> = table
        .execute(&[], &requested)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(Row::is_empty));

    let query = table.client().unwrap().last_query().unwrap();
    assert_eq!(
        query.sql,
        "SELECT * FROM `bigquery-public-data.usa_names.usa_1910_current`"
    );
}

#[test]
fn test_submitted_query() {
    let connector = |_: &FdwOptions| -> ClientResult<MemoryClient> { Ok(MemoryClient::new(vec![])) };
    let table = ForeignTable::new(options(), schema(), connector);

    let rows = table.execute(&quals(), &["name", "number"]).unwrap();
    assert!(rows.skipped().is_empty());
    assert_eq!(rows.count(), 0);

    let query = table.client().unwrap().last_query().unwrap();
    assert_eq!(
        query.sql,
        "SELECT name  as name, number  as number FROM `bigquery-public-data.usa_names.usa_1910_current` WHERE number > @number AND year = @year"
    );
    assert_eq!(query.parameters.len(), 2);
    assert_eq!(query.parameters[0].value, Value::Int(1000));
    assert_eq!(query.parameters[1].value, Value::Int(2017));
    assert_eq!(query.dialect, Dialect::Standard);
}

#[test]
fn test_client_created_once() {
    let connects = Cell::new(0);
    let connector = |_: &FdwOptions| -> ClientResult<MemoryClient> {
        connects.set(connects.get() + 1);
        Ok(MemoryClient::new(projected_rows(&["state"])))
    };
    let table = ForeignTable::new(options(), schema(), connector);
    assert_eq!(connects.get(), 0);

    for _ in 0..3 {
        let rows = table.execute(&quals(), &["state"]).unwrap();
        assert_eq!(rows.count(), 2);
    }
    assert_eq!(connects.get(), 1);
    assert_eq!(table.client().unwrap().queries().len(), 3);
}

#[test]
fn test_unknown_column_fails_before_executing() {
    let connects = Cell::new(0);
    let connector = |_: &FdwOptions| -> ClientResult<MemoryClient> {
        connects.set(connects.get() + 1);
        Ok(MemoryClient::new(bq_rows()))
    };
    let table = ForeignTable::new(options(), schema(), connector);

    let result = table.execute(&quals(), &["state", "county"]);
    assert!(matches!(result, Err(ExecuteError::UnknownColumn(ref c)) if c == "county"));

    let result = table.execute(&[Qualifier::new("county", Operator::Eq, "Kings")], &["state"]);
    assert!(matches!(result, Err(ExecuteError::Compile(_))));
    assert_eq!(connects.get(), 0);
}

#[test]
fn test_missing_key_is_shape_mismatch() {
    let rows = vec![[("state", "TX")].into_iter().collect::<Row>()];
    let connector =
        move |_: &FdwOptions| -> ClientResult<MemoryClient> { Ok(MemoryClient::new(rows.clone())) };
    let table = ForeignTable::new(options(), schema(), connector);

    let mut result = table.execute(&[], &["state", "name"]).unwrap();
    match result.next() {
        Some(Err(ExecuteError::ShapeMismatch { expected, actual })) => {
            assert_eq!(expected, vec!["state", "name"]);
            assert_eq!(actual, vec!["state"]);
        }
        other => panic!("expected shape mismatch, got {:?}", other.map(|r| r.is_ok())),
    }
}

#[test]
fn test_extra_key_is_shape_mismatch() {
    let connector = |_: &FdwOptions| -> ClientResult<MemoryClient> { Ok(MemoryClient::new(bq_rows())) };
    let table = ForeignTable::new(options(), schema(), connector);

    let mut rows = table.execute(&[], &["state"]).unwrap();
    assert!(matches!(
        rows.next(),
        Some(Err(ExecuteError::ShapeMismatch { .. }))
    ));
    // the stream stops after the first error
    assert!(rows.next().is_none());
}

#[test]
fn test_client_error_propagates() {
    let connector =
        |_: &FdwOptions| -> ClientResult<MemoryClient> { Ok(MemoryClient::failing("Access Denied")) };
    let table = ForeignTable::new(options(), schema(), connector);

    let result = table.execute(&quals(), &["state"]);
    match result {
        Err(ExecuteError::Execution(e)) => assert!(e.to_string().contains("Access Denied")),
        _ => panic!("expected execution error"),
    }
}

#[test]
fn test_warehouse_type() {
    let connector = |_: &FdwOptions| -> ClientResult<MemoryClient> { Ok(MemoryClient::default()) };
    let table = ForeignTable::new(options(), schema(), connector);

    assert_eq!(table.warehouse_type("number", None).unwrap(), "INT64");
    assert_eq!(
        table.warehouse_type("number", Some(Dialect::Legacy)).unwrap(),
        "INTEGER"
    );
    assert_eq!(
        table.warehouse_type("name", None).unwrap(),
        WarehouseType::String.standard_name()
    );
    assert!(matches!(
        table.warehouse_type("county", None),
        Err(ExecuteError::UnknownColumn(_))
    ));
}

#[test]
fn test_build_query_does_not_connect() {
    let connects = Cell::new(0);
    let connector = |_: &FdwOptions| -> ClientResult<MemoryClient> {
        connects.set(connects.get() + 1);
        Ok(MemoryClient::default())
    };
    let table = ForeignTable::new(options(), schema(), connector);

    let compiled = table.build_query(&quals(), Some(table.schema())).unwrap();
    assert_eq!(compiled.parameters.len(), 2);
    assert_eq!(connects.get(), 0);
}
