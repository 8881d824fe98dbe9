//! Result rendering for the human and JSON output modes.

mod formatter;
mod human;
mod json;

pub use formatter::OutputFormatter;

use crate::cli::Cli;
use human::HumanFormatter;
use json::JsonFormatter;

/// Output mode selected by the global flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputStyle {
    Json,
    Human { verbose: bool, quiet: bool },
}

impl OutputStyle {
    /// `--json` overrides the human-output flags.
    const fn from_flags(json: bool, verbose: bool, quiet: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Human { verbose, quiet }
        }
    }
}

/// Builds the formatter for the parsed command line.
pub fn create_formatter(cli: &Cli) -> Box<dyn OutputFormatter> {
    match OutputStyle::from_flags(cli.json, cli.verbose, cli.quiet) {
        OutputStyle::Json => Box::new(JsonFormatter),
        OutputStyle::Human { verbose, quiet } => Box::new(HumanFormatter::new(verbose, quiet)),
    }
}
