/*!
Compose command - convert JSON to canonical DAG-CBOR
*/

use super::io::{Input, Output};
use super::json;
use anyhow::Context;
use clap::Parser;
use grove_cbor::encode;

/// Convert JSON to canonical DAG-CBOR
#[derive(Parser, Debug)]
#[command(
    about = "Convert JSON to canonical DAG-CBOR",
    long_about = "Parse JSON and encode it as canonical DAG-CBOR.\n\n\
                  Objects of the form {\"$link\": \"<cid>\"} become links and\n\
                  {\"$bytes\": \"<base64>\"} become byte strings. Map keys are\n\
                  sorted canonically whatever their order in the input."
)]
pub struct Command {
    /// Print the CID of the composed record to stderr
    #[arg(long)]
    cid: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input JSON file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let text = self.input.read_to_string()?;
        let parsed: serde_json::Value = serde_json::from_str(&text).context("Invalid JSON")?;

        let (cid, data) = match json::from_json(parsed)?.into_map() {
            Ok(map) => {
                let (cid, data) = encode::encode_with_cid(&map)?;
                (Some(cid), data)
            }
            Err(other) => {
                tracing::warn!("Composing a {} rather than a map record", other.kind());
                (None, encode::encode_value(&other)?)
            }
        };

        if self.cid {
            match cid {
                Some(cid) => eprintln!("{cid}"),
                None => anyhow::bail!("Only map records are content addressed"),
            }
        }

        self.output.unwrap_or_default().write_all(&data)
    }
}
