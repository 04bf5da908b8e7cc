/*!
CID commands - compute the CID of some content, or take one apart
*/

use super::io::Input;
use clap::{Subcommand, ValueEnum};
use grove_cbor::cid::{Cid, Codec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CodecArg {
    /// Opaque bytes, such as blobs
    Raw,
    /// DAG-CBOR records
    DagCbor,
}

impl From<CodecArg> for Codec {
    fn from(value: CodecArg) -> Self {
        match value {
            CodecArg::Raw => Codec::Raw,
            CodecArg::DagCbor => Codec::DagCbor,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the CID of a file's content
    Create {
        /// Codec the content is declared as
        #[arg(long, default_value = "dag-cbor", value_name = "CODEC")]
        codec: CodecArg,

        /// Print the empty CID for the codec instead
        #[arg(long, conflicts_with = "input")]
        empty: bool,

        /// Input file (use '-' for stdin)
        #[arg(required_unless_present = "empty")]
        input: Option<Input>,
    },

    /// Parse a CID and print its fields
    Parse {
        /// CID in base32 text form, e.g. bafyrei...
        cid: String,
    },
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        match self {
            Command::Create {
                codec,
                empty: true,
                ..
            } => println!("{}", Cid::create_empty(codec.into())),
            Command::Create {
                codec,
                input: Some(input),
                ..
            } => {
                let content = input.read_all()?;
                println!("{}", Cid::create(codec.into(), &content));
            }
            Command::Create { .. } => anyhow::bail!("No input given"),
            Command::Parse { cid } => {
                let cid = Cid::parse(&cid).map_err(|e| anyhow::anyhow!("Invalid CID {cid:?}: {e}"))?;
                println!("version:   {}", cid.version());
                println!("codec:     {} ({:#04x})", cid.codec(), cid.codec().code());
                println!("hash:      sha2-256 ({:#04x})", cid.hash_type());
                if cid.is_empty() {
                    println!("digest:    (empty)");
                } else {
                    println!("digest:    {}", hex::encode(cid.digest()));
                }
                println!("bytes:     {}", hex::encode(cid.to_bytes()));
            }
        }
        Ok(())
    }
}
