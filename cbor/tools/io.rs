/*!
Reading command input from files or stdin, and writing results to files
or stdout
*/

use anyhow::Context;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Input source, '-' is stdin
#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn read_all(&self) -> anyhow::Result<Vec<u8>> {
        match self {
            Input::Stdin => {
                let mut buffer = Vec::new();
                io::stdin()
                    .read_to_end(&mut buffer)
                    .context("Failed to read stdin")?;
                Ok(buffer)
            }
            Input::File(path) => {
                fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
            }
        }
    }

    pub fn read_to_string(&self) -> anyhow::Result<String> {
        String::from_utf8(self.read_all()?).context("Input is not valid UTF-8")
    }
}

impl FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Input::Stdin)
        } else {
            Ok(Input::File(PathBuf::from(s)))
        }
    }
}

/// Output destination, absent or '-' is stdout
#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn write_all(&self, data: &[u8]) -> anyhow::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data)?;
                stdout.flush()?;
                Ok(())
            }
            Output::File(path) => {
                fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
            }
        }
    }

    /// Writes `text`, newline-terminated when going to a terminal
    pub fn write_text(&self, text: &str) -> anyhow::Result<()> {
        match self {
            Output::Stdout => self.write_all(format!("{text}\n").as_bytes()),
            Output::File(_) => self.write_all(text.as_bytes()),
        }
    }
}

impl FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "-" {
            Ok(Output::Stdout)
        } else {
            Ok(Output::File(PathBuf::from(s)))
        }
    }
}
