//! Client driving the Google Cloud `bq` command-line tool.
//!
//! Each query is one `bq` invocation:
//!
//! ```text
//! bq --format=json query --use_legacy_sql=false --max_rows=1000 \
//!     --parameter=number:INT64:1000 'SELECT ...'
//! ```
//!
//! `bq` prints the result as a JSON array of objects whose scalar values
//! are all strings.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use serde::de::{self, Deserializer as _, SeqAccess, Visitor};
use tracing::debug;

use super::error::{ClientError, ClientResult};
use super::{row_from_json, RowStream, WarehouseClient};
use crate::config::FdwOptions;
use crate::model::{Row, Value};
use crate::sql::dialect::Dialect;
use crate::sql::params::QueryParameter;

/// Environment variable Google client libraries read the key path from.
const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Row cap when none is configured.
const DEFAULT_MAX_ROWS: u64 = 100_000;

/// Decoded rows waiting to be pulled.
const ROW_BUFFER: usize = 1;

/// Runs queries through `bq`.
#[derive(Debug, Clone)]
pub struct BqCommandClient {
    program: PathBuf,
    key: Option<PathBuf>,
    max_rows: u64,
}

impl BqCommandClient {
    /// Client using `bq` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("bq"),
            key: None,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }

    /// Client configured from a table's `key` and `max_rows` options.
    pub fn from_options(options: &FdwOptions) -> Self {
        let mut client = Self::new();
        client.key = options.key.clone();
        if let Some(max_rows) = options.max_rows {
            client.max_rows = max_rows;
        }
        client
    }

    pub fn with_program<P: AsRef<Path>>(mut self, program: P) -> Self {
        self.program = program.as_ref().to_path_buf();
        self
    }

    pub fn with_key<P: AsRef<Path>>(mut self, key: P) -> Self {
        self.key = Some(key.as_ref().to_path_buf());
        self
    }

    pub fn with_max_rows(mut self, max_rows: u64) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Command-line arguments for one query.
    pub fn args(&self, sql: &str, parameters: &[QueryParameter], dialect: Dialect) -> Vec<String> {
        let mut args = vec![
            "--format=json".to_string(),
            "query".to_string(),
            format!("--use_legacy_sql={}", dialect.use_legacy_sql()),
            format!("--max_rows={}", self.max_rows),
        ];
        args.extend(parameters.iter().map(parameter_arg));
        args.push(sql.to_string());
        args
    }

    fn command(&self, sql: &str, parameters: &[QueryParameter], dialect: Dialect) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(sql, parameters, dialect))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(key) = &self.key {
            cmd.env(CREDENTIALS_ENV, key);
        }
        cmd
    }
}

impl Default for BqCommandClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WarehouseClient for BqCommandClient {
    fn run_query(
        &self,
        sql: &str,
        parameters: &[QueryParameter],
        dialect: Dialect,
    ) -> ClientResult<RowStream<'_>> {
        debug!(program = %self.program.display(), "running bq query");

        let mut child = self
            .command(sql, parameters, dialect)
            .spawn()
            .map_err(|source| ClientError::SpawnFailed {
                program: self.program.display().to_string(),
                source,
            })?;

        let (tx, rx) = mpsc::sync_channel(ROW_BUFFER);
        let reader = child
            .stdout
            .take()
            .map(|stdout| thread::spawn(move || read_rows(stdout, tx)));
        let stderr = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut text = String::new();
                // best effort; the exit status decides failure
                let _ = stderr.read_to_string(&mut text);
                text
            })
        });

        Ok(Box::new(BqRows {
            child,
            rows: rx,
            reader,
            stderr,
            done: false,
        }))
    }
}

/// `--parameter` argument for one parameter.
///
/// `bq` reads the short form's value `NULL` as a null, so a string that is
/// literally `NULL` is passed in the JSON form instead.
fn parameter_arg(p: &QueryParameter) -> String {
    match &p.value {
        Value::String(s) if s == "NULL" => {
            let definition = serde_json::json!({
                "name": p.name,
                "parameterType": { "type": p.type_name() },
                "parameterValue": { "value": s },
            });
            format!("--parameter={}", definition)
        }
        value => format!(
            "--parameter={}:{}:{}",
            p.name,
            p.type_name(),
            value.to_param_string()
        ),
    }
}

// ============================================================================
// Row Stream
// ============================================================================

/// Rows decoded from a running `bq` process.
///
/// The JSON array on stdout is decoded one element at a time on a reader
/// thread. The process is reaped once the array ends; a failed exit status
/// is reported as the last item.
struct BqRows {
    child: Child,
    rows: Receiver<serde_json::Value>,
    reader: Option<JoinHandle<Result<(), serde_json::Error>>>,
    stderr: Option<JoinHandle<String>>,
    done: bool,
}

impl BqRows {
    fn finish(&mut self) -> ClientResult<()> {
        let status = self.child.wait().map_err(ClientError::Wait)?;
        let decoded = match self.reader.take().map(JoinHandle::join) {
            Some(Ok(result)) => result,
            Some(Err(_)) => return Err(ClientError::ReaderPanicked),
            None => Ok(()),
        };
        let stderr = match self.stderr.take().map(JoinHandle::join) {
            Some(Ok(text)) => text,
            Some(Err(_)) => return Err(ClientError::ReaderPanicked),
            None => String::new(),
        };

        if !status.success() {
            return Err(ClientError::CommandFailed {
                status: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }
        decoded.map_err(ClientError::InvalidOutput)
    }
}

impl Iterator for BqRows {
    type Item = ClientResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.rows.recv() {
            Ok(value) => Some(row_from_json(value)),
            Err(_) => {
                self.done = true;
                self.finish().err().map(Err)
            }
        }
    }
}

impl Drop for BqRows {
    fn drop(&mut self) {
        if !self.done {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Decode a JSON array of rows from `output`, sending each element as soon
/// as it is complete. Empty output means no rows.
fn read_rows<R: Read>(output: R, rows: SyncSender<serde_json::Value>) -> Result<(), serde_json::Error> {
    let mut reader = BufReader::new(output);
    if !has_content(&mut reader).map_err(serde_json::Error::io)? {
        return Ok(());
    }
    let mut de = serde_json::Deserializer::from_reader(reader);
    (&mut de).deserialize_seq(RowSender(&rows))?;
    de.end()
}

/// Skip leading whitespace; false when the output ends first.
fn has_content<R: BufRead>(reader: &mut R) -> io::Result<bool> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(false);
        }
        let blank = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
        let more = blank < buf.len();
        reader.consume(blank);
        if more {
            return Ok(true);
        }
    }
}

struct RowSender<'a>(&'a SyncSender<serde_json::Value>);

impl<'de> Visitor<'de> for RowSender<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON array of result rows")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        while let Some(row) = seq.next_element::<serde_json::Value>()? {
            if self.0.send(row).is_err() {
                return Err(de::Error::custom("row stream closed"));
            }
        }
        Ok(())
    }
}
