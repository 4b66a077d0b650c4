//! Output rendering: a human-readable default and a machine-readable JSON
//! mode for scripting, matching the command surface's two-audience split.

use clap::ValueEnum;
use serde::Serialize;

/// Selects how a command renders its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lower")]
pub enum OutputFormat {
    /// Plain text for a terminal.
    Human,
    /// Pretty-printed JSON for scripts.
    Json,
}

/// A command result that knows how to render itself in either format.
pub trait Output {
    /// Render as plain text.
    fn write_human(&self) -> String;

    /// Write `self` in `format` to stdout.
    fn write(&self, format: OutputFormat)
    where
        Self: Serialize,
    {
        match format {
            OutputFormat::Human => println!("{}", self.write_human()),
            OutputFormat::Json => match serde_json::to_writer_pretty(std::io::stdout(), self) {
                Ok(()) => println!(),
                Err(err) => eprintln!("failed to serialize output: {err}"),
            },
        }
    }
}
