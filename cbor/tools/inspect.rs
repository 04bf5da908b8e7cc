/*!
Inspect command - display DAG-CBOR data in various formats
*/

use super::io::{Input, Output};
use super::json;
use anyhow::Context;
use clap::Parser;
use grove_cbor::decode;

/// Inspect and display DAG-CBOR data
#[derive(Parser, Debug)]
#[command(about = "Inspect and display DAG-CBOR data", long_about = None)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "json",
        value_name = "FORMAT",
        help = "Output format: json (links as $link, bytes as $bytes), hex, debug"
    )]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input DAG-CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Hexadecimal dump of the input, once validated
    Hex,
    /// The decoded value tree
    Debug,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let data = self.input.read_all()?;

        // Every format validates, so hex output is only produced for canonical input
        let value = decode::decode(&data).context("Failed to decode input")?;
        tracing::debug!("Decoded {} bytes of {}", data.len(), value.kind());

        let text = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&json::to_json(&value)?)?,
            OutputFormat::Hex => hex::encode(&data),
            OutputFormat::Debug => format!("{value:#?}"),
        };

        self.output.unwrap_or_default().write_text(&text)
    }
}
