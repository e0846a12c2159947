use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::{Value as JsonValue, json};
use tracing::Level;

use sql_bindexec::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Execute parameterized SQL against a SQLite database")]
struct Args {
    /// Database file; `:memory:` for a throwaway database.
    #[arg(long)]
    db: Option<String>,
    /// SQL text with `?` placeholders.
    #[arg(long)]
    sql: String,
    /// JSON array of positional parameter values.
    #[arg(long, conflicts_with = "batch")]
    params: Option<String>,
    /// JSON array of parameter arrays, executed in order on one prepared statement.
    #[arg(long)]
    batch: Option<String>,
    /// Print the statement as the connector sees it and exit.
    #[arg(long)]
    describe: bool,
    #[arg(long, value_enum)]
    encoding: Option<TextEncoding>,
    #[arg(long)]
    busy_timeout_ms: Option<u64>,
    /// JSON file holding `SqliteOptions`; flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(args.log_level)
        .init();

    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("sqlexec: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, ConnectorError> {
    let statement = Statement::parse(&args.sql);
    if args.describe {
        return Ok(statement.describe());
    }

    let opts = options(args)?;
    let mut conn = Connector::open(&opts)?;

    let outcome = if let Some(batch) = &args.batch {
        let sets = parse_batch(batch)?;
        conn.execute_batch(&statement, &sets)
    } else if let Some(params) = &args.params {
        let set = ParameterSet::try_from(parse_json(params)?)?;
        conn.execute_with(&statement, &set)
    } else {
        conn.execute(&statement)
    };

    let result = outcome.into_result()?;
    let rendered = match result.result_set {
        Some(rs) => JsonValue::Array(rs.results.iter().map(DbRow::to_json).collect()),
        None => json!({ "rows_affected": result.rows_affected }),
    };
    serde_json::to_string_pretty(&rendered)
        .map_err(|e| ConnectorError::ConfigError(format!("failed to render output: {e}")))
}

fn options(args: &Args) -> Result<SqliteOptions, ConnectorError> {
    let mut opts = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                ConnectorError::ConfigError(format!("failed to read {}: {e}", path.display()))
            })?;
            SqliteOptions::from_json_str(&text)?
        }
        None => SqliteOptions::in_memory(),
    };
    if let Some(db) = &args.db {
        opts.db_path.clone_from(db);
    }
    if let Some(encoding) = args.encoding {
        opts.encoding = encoding;
    }
    if let Some(ms) = args.busy_timeout_ms {
        opts.busy_timeout_ms = ms;
    }
    Ok(opts)
}

fn parse_json(text: &str) -> Result<JsonValue, ConnectorError> {
    serde_json::from_str(text)
        .map_err(|e| ConnectorError::ConfigError(format!("invalid JSON parameters: {e}")))
}

fn parse_batch(text: &str) -> Result<Vec<ParameterSet>, ConnectorError> {
    match parse_json(text)? {
        JsonValue::Array(rows) => rows.into_iter().map(ParameterSet::try_from).collect(),
        other => Err(ConnectorError::ConfigError(format!(
            "--batch expects a JSON array of parameter arrays, got {other}"
        ))),
    }
}
