/*!
Grove - A CLI for working with DAG-CBOR records

# Commands

- `inspect`: Display DAG-CBOR data as JSON, hex or a debug tree
- `compose`: Convert JSON to canonical DAG-CBOR
- `cid`: Compute and parse content identifiers
- `tid`: Generate and parse timestamp identifiers

# Examples

```bash
# Inspect a record as JSON, links as {"$link": ...} and bytes as {"$bytes": ...}
grove inspect record.cbor

# Compose a record from JSON
echo '{"text": "hello", "createdAt": "2024-01-01T00:00:00Z"}' | grove compose -o record.cbor -

# The CID of a record
grove cid create record.cbor

# Round-trip test
grove inspect record.cbor | grove compose - | cmp - record.cbor

# Some TIDs, with verbose clock logging
grove --log-level trace tid now --count 3
```
*/

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod cid;
mod compose;
mod inspect;
mod io;
mod json;
mod tid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Verbosity {
    /// Designates very low priority, often extremely verbose, information.
    #[value(name = "trace")]
    Trace,

    /// Designates lower priority information.
    #[value(name = "debug")]
    Debug,

    /// Designates useful information.
    #[value(name = "info")]
    Info,

    /// Designates hazardous situations.
    #[value(name = "warn")]
    Warn,

    /// Designates very serious errors.
    #[value(name = "error")]
    Error,
}

impl From<Verbosity> for tracing::Level {
    fn from(value: Verbosity) -> Self {
        match value {
            Verbosity::Trace => tracing::Level::TRACE,
            Verbosity::Debug => tracing::Level::DEBUG,
            Verbosity::Info => tracing::Level::INFO,
            Verbosity::Warn => tracing::Level::WARN,
            Verbosity::Error => tracing::Level::ERROR,
        }
    }
}

/// A CLI tool for working with DAG-CBOR records
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for inspecting and composing DAG-CBOR records",
    long_about = "Grove provides utilities for content-addressed DAG-CBOR data.\n\n\
                  Features:\n\
                  - Inspect DAG-CBOR data, with strict canonical-form checking\n\
                  - Compose canonical DAG-CBOR from JSON\n\
                  - Compute and parse CIDs\n\
                  - Generate and parse TIDs"
)]
struct Cli {
    /// Log level, overriding RUST_LOG. Default 'warn'.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<Verbosity>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect and display DAG-CBOR data in various formats
    Inspect(inspect::Command),

    /// Convert JSON to canonical DAG-CBOR
    Compose(compose::Command),

    /// Compute or parse a CID
    #[command(subcommand)]
    Cid(cid::Command),

    /// Generate or parse a TID
    #[command(subcommand)]
    Tid(tid::Command),
}

fn init_logger(level: Option<Verbosity>) -> anyhow::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::new(tracing::Level::from(level).to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(matches!(level, Some(Verbosity::Trace | Verbosity::Debug)))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global default subscriber: {e}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level)?;

    match cli.command {
        Commands::Inspect(args) => args.exec(),
        Commands::Compose(args) => args.exec(),
        Commands::Cid(args) => args.exec(),
        Commands::Tid(args) => args.exec(),
    }
}
