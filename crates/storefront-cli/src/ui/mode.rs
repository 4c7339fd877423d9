//! Output mode routing.

use std::str::FromStr;

use crate::errors::CliError;

/// Where stdout is going, as far as output decisions care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Terminal {
    pub is_tty: bool,
    pub is_dumb: bool,
}

/// `--format` values for human output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Plain,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "table" => Ok(OutputFormat::Table),
            "plain" => Ok(OutputFormat::Plain),
            other => Err(CliError::invalid_input(format!(
                "Unsupported format: {} (use table or plain)",
                other
            ))),
        }
    }
}

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One JSON document, nothing else on stdout
    Json,
    /// Tab-separated rows and `key=value` lines
    #[default]
    Plain,
    /// Styled tables for a terminal
    Pretty,
}

impl OutputMode {
    /// `--json` beats `--format`; tables need a real terminal, so a pipe or
    /// `TERM=dumb` always gets plain.
    pub fn resolve(json: bool, format: Option<OutputFormat>, terminal: Terminal) -> Self {
        match (json, format) {
            (true, _) => Self::Json,
            (false, Some(OutputFormat::Plain)) => Self::Plain,
            (false, _) if terminal.is_tty && !terminal.is_dumb => Self::Pretty,
            (false, _) => Self::Plain,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}
