use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use recordpath::config::Config;
use recordpath::file::loader::{load_records, load_records_from_stdin};
use recordpath::file::saver::{save_records, serialize_records, to_json_value_string};
use recordpath::jsonpath::{MapGetter, MapUpdater};
use recordpath::record::{Map, Value};
use recordpath::transform::MapTransform;

/// recordpath - JsonPath queries and updates over JSON, JSONL and YAML records
#[derive(Parser)]
#[command(name = "recordpath")]
#[command(version)]
#[command(about = "Query and update records with JsonPath expressions", long_about = None)]
struct Cli {
    /// Pretty-print JSON output (overrides the config file)
    #[arg(long, global = true)]
    pretty: bool,

    /// Config file (default: ~/.config/recordpath/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the value at every path the expression resolves to
    Get {
        /// JsonPath expression, e.g. '$.items[*].price'
        expression: String,
        /// Input file (omit to read stdin)
        file: Option<PathBuf>,
    },
    /// Write a value at every leaf the expression resolves to
    Set {
        /// JsonPath expression
        expression: String,
        /// Replacement value, as JSON (quote strings: '"text"')
        value: String,
        /// Input file (omit to read stdin)
        file: Option<PathBuf>,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the update rules from the config file
    Apply {
        /// Input file (omit to read stdin)
        file: Option<PathBuf>,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(config: &Config) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_input(file: Option<&Path>) -> Result<Vec<Map>> {
    match file {
        Some(path) => load_records(path),
        None if !io::stdin().is_terminal() => load_records_from_stdin(),
        None => anyhow::bail!("No input: pass a file or pipe records on stdin"),
    }
}

fn write_output(records: &[Map], output: Option<&Path>, pretty: bool) -> Result<()> {
    match output {
        Some(path) => {
            save_records(path, records, pretty)?;
            info!(path = %path.display(), records = records.len(), "saved records");
            Ok(())
        }
        None => {
            let content = serialize_records(records, pretty)?;
            io::stdout()
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    init_logging(&config);
    let pretty = cli.pretty || config.pretty;

    match cli.command {
        Command::Get { expression, file } => {
            let getter = MapGetter::new(&expression)?;
            let records = read_input(file.as_deref())?;
            let mut stdout = io::stdout().lock();
            for (i, record) in records.iter().enumerate() {
                let found = getter
                    .run(record)
                    .with_context(|| format!("Failed to evaluate record {}", i + 1))?;
                debug!(record = i + 1, matches = found.len(), "evaluated");
                let line = to_json_value_string(&Value::Map(found), pretty)?;
                writeln!(stdout, "{}", line).context("Failed to write to stdout")?;
            }
        }
        Command::Set {
            expression,
            value,
            file,
            output,
        } => {
            let updater = MapUpdater::new(&expression)?;
            let json: serde_json::Value = serde_json::from_str(&value)
                .with_context(|| format!("Value is not valid JSON: {}", value))?;
            let value = Value::from(json);

            let records = read_input(file.as_deref())?;
            let updated = records
                .iter()
                .enumerate()
                .map(|(i, record)| {
                    updater
                        .run(record, &value)
                        .with_context(|| format!("Failed to update record {}", i + 1))
                })
                .collect::<Result<Vec<_>>>()?;
            write_output(&updated, output.as_deref(), pretty)?;
        }
        Command::Apply { file, output } => {
            let transform = MapTransform::from_config(&config)?;
            if transform.is_empty() {
                info!("no rules configured, records pass through unchanged");
            }

            let records = read_input(file.as_deref())?;
            let updated = records
                .iter()
                .enumerate()
                .map(|(i, record)| {
                    transform
                        .apply(record)
                        .with_context(|| format!("Failed to transform record {}", i + 1))
                })
                .collect::<Result<Vec<_>>>()?;
            write_output(&updated, output.as_deref(), pretty)?;
        }
    }

    Ok(())
}
