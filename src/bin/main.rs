//! bqfdw CLI - compile and run foreign-table scans against BigQuery
//!
//! Usage:
//!   bqfdw compile <table.toml> [-q <qual>]... [-c <columns>] [--check] [--format <format>]
//!   bqfdw query <table.toml> [-q <qual>]... [-c <columns>] [--bq <path>]
//!   bqfdw types [--dialect <dialect>]
//!
//! Examples:
//!   bqfdw compile usa_names.toml -q 'number > 1000' -q 'year = 2017'
//!   bqfdw compile usa_names.toml -c state,number,_fdw_count --check
//!   bqfdw query usa_names.toml -q "name ~~ 'Mar%'" -c name,number
//!   bqfdw types --dialect legacy

use bqfdw::client::{BqCommandClient, ClientResult};
use bqfdw::config::{FdwOptions, TableConfig};
use bqfdw::execute::ForeignTable;
use bqfdw::model::{ColumnDefinition, Qualifier};
use bqfdw::sql::{type_mappings, validate_sql, Dialect};
use bqfdw::{logging, QueryCompiler};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bqfdw")]
#[command(about = "bqfdw - compile foreign-table scans to parameterized BigQuery SQL")]
#[command(version)]
struct Cli {
    /// Log compiled queries
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a scan to SQL without running it
    Compile {
        /// Path to the table definition (.toml)
        file: PathBuf,

        /// Qualifier, e.g. 'number > 1000' (repeatable)
        #[arg(short, long = "qual")]
        qual: Vec<String>,

        /// Comma-separated columns to project ('*' for SELECT *)
        #[arg(short, long)]
        columns: Option<String>,

        /// Override the table's SQL dialect
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Check the generated SQL parses
        #[arg(long)]
        check: bool,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        format: OutputFormat,
    },

    /// Run a scan with the bq command-line tool
    Query {
        /// Path to the table definition (.toml)
        file: PathBuf,

        /// Qualifier, e.g. 'number > 1000' (repeatable)
        #[arg(short, long = "qual")]
        qual: Vec<String>,

        /// Comma-separated columns to fetch
        #[arg(short, long)]
        columns: Option<String>,

        /// Path to the bq executable
        #[arg(long, default_value = "bq")]
        bq: PathBuf,
    },

    /// Print the type catalog
    Types {
        /// Dialect whose type names to print
        #[arg(short, long, default_value = "standard")]
        dialect: DialectArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Standard,
    Legacy,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Standard => Dialect::Standard,
            DialectArg::Legacy => Dialect::Legacy,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// SQL, then one parameter per line as comments
    Sql,
    /// The compiled query as JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Compile {
            file,
            qual,
            columns,
            dialect,
            check,
            format,
        } => cmd_compile(file, qual, columns, dialect, check, format, cli.verbose),
        Commands::Query {
            file,
            qual,
            columns,
            bq,
        } => cmd_query(file, qual, columns, bq, cli.verbose),
        Commands::Types { dialect } => cmd_types(dialect.into()),
    }
}

/// A loaded table definition.
struct Table {
    options: FdwOptions,
    schema: Vec<ColumnDefinition>,
}

fn load_table(file: &PathBuf, verbose: bool) -> Result<Table, String> {
    let config = TableConfig::from_file(file)
        .map_err(|e| format!("Error reading table '{}': {}", file.display(), e))?;
    let mut options = config
        .fdw_options()
        .map_err(|e| format!("Invalid options in '{}': {}", file.display(), e))?;
    let schema = config
        .column_definitions()
        .map_err(|e| format!("Invalid columns in '{}': {}", file.display(), e))?;
    options.verbose |= verbose;
    Ok(Table { options, schema })
}

fn parse_quals(raw: &[String]) -> Result<Vec<Qualifier>, String> {
    raw.iter()
        .map(|q| q.parse().map_err(|e| format!("Invalid qualifier '{}': {}", q, e)))
        .collect()
}

/// Requested column names; `None` for `*`. Defaults to every declared column.
fn requested_columns(table: &Table, columns: Option<&str>) -> Option<Vec<String>> {
    match columns.map(str::trim) {
        Some("*") => None,
        Some(list) => Some(
            list.split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        ),
        None => Some(table.schema.iter().map(|c| c.name.clone()).collect()),
    }
}

/// Columns to fetch for `query`, where `*` means every declared column.
fn query_columns(table: &Table, columns: Option<&str>) -> Vec<String> {
    requested_columns(table, columns)
        .unwrap_or_else(|| table.schema.iter().map(|c| c.name.clone()).collect())
}

#[allow(clippy::too_many_arguments)]
fn cmd_compile(
    file: PathBuf,
    qual: Vec<String>,
    columns: Option<String>,
    dialect: Option<DialectArg>,
    check: bool,
    format: OutputFormat,
    verbose: bool,
) -> ExitCode {
    let mut table = match load_table(&file, verbose) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(dialect) = dialect {
        table.options.dialect = dialect.into();
    }

    let quals = match parse_quals(&qual) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let projection = match requested_columns(&table, columns.as_deref()) {
        Some(names) => {
            let mut resolved = Vec::with_capacity(names.len());
            for name in &names {
                match table.schema.iter().find(|c| &c.name == name) {
                    Some(c) => resolved.push(c.clone()),
                    None => {
                        eprintln!("Unknown column: {}", name);
                        return ExitCode::FAILURE;
                    }
                }
            }
            Some(resolved)
        }
        None => None,
    };

    let compiler = QueryCompiler::new(&table.options, &table.schema);
    let compiled = match compiler.build_query(&quals, projection.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for skipped in &compiled.skipped {
        eprintln!("-- not pushed down: {} ({})", skipped.qualifier, skipped.reason);
    }

    if check {
        if let Err(e) = validate_sql(&compiled.sql, compiled.dialect) {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    match format {
        OutputFormat::Sql => {
            println!("{}", compiled.sql);
            for p in &compiled.parameters {
                println!("-- @{} {} = {}", p.name, p.type_name(), p.value.to_param_string());
            }
        }
        OutputFormat::Json => {
            let mut value = match serde_json::to_value(&compiled) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("Error serializing query: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            value["fingerprint"] = compiled.fingerprint().into();
            match serde_json::to_string_pretty(&value) {
                Ok(s) => println!("{}", s),
                Err(e) => {
                    eprintln!("Error serializing query: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    ExitCode::SUCCESS
}

fn cmd_query(
    file: PathBuf,
    qual: Vec<String>,
    columns: Option<String>,
    bq: PathBuf,
    verbose: bool,
) -> ExitCode {
    let table = match load_table(&file, verbose) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let quals = match parse_quals(&qual) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let requested = query_columns(&table, columns.as_deref());

    let connector = move |options: &FdwOptions| -> ClientResult<BqCommandClient> {
        Ok(BqCommandClient::from_options(options).with_program(&bq))
    };
    let foreign = ForeignTable::new(table.options, table.schema, connector);

    let rows = match foreign.execute(&quals, &requested) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Query error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for skipped in rows.skipped() {
        eprintln!("-- not pushed down: {} ({})", skipped.qualifier, skipped.reason);
    }

    for row in rows {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Query error: {}", e);
                return ExitCode::FAILURE;
            }
        };
        match serde_json::to_string(&row) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("Error serializing row: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn cmd_types(dialect: Dialect) -> ExitCode {
    println!("{:<20} {}", "relational", dialect);
    for mapping in type_mappings() {
        let name = match dialect {
            Dialect::Standard => mapping.standard,
            Dialect::Legacy => mapping.legacy,
        };
        println!("{:<20} {}", mapping.relational.base_type_name(), name);
    }
    ExitCode::SUCCESS
}
