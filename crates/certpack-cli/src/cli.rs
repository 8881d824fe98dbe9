//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "certpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the files of a directory with their validation status
    List(ListArgs),
    /// Pack the ready files of a directory into a zip archive
    Pack(PackArgs),
    /// Unpack a zip archive into a directory
    Unpack(UnpackArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Directory to list
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    /// Validate file names as bank certificates
    #[arg(short, long)]
    pub certificates: bool,

    /// Only show files not held open by another process
    #[arg(short, long)]
    pub unlocked: bool,

    /// Only show files that passed validation
    #[arg(long)]
    pub valid: bool,

    /// Only show certificates issued by this bank
    #[arg(long, value_name = "CODE", value_parser = parse_bank_code)]
    pub bank_code: Option<String>,
}

#[derive(clap::Args)]
pub struct PackArgs {
    /// Directory holding the files to pack
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    /// Archive file to create
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Validate file names as bank certificates
    #[arg(short, long)]
    pub certificates: bool,

    /// Only pack certificates issued by this bank
    #[arg(long, value_name = "CODE", value_parser = parse_bank_code)]
    pub bank_code: Option<String>,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Delete the source files once the archive is complete
    #[arg(long)]
    pub delete_sources: bool,
}

#[derive(clap::Args)]
pub struct UnpackArgs {
    /// Archive file to unpack
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Destination directory
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,

    /// Delete the archive once every file is unpacked
    #[arg(long)]
    pub delete_archive: bool,

    /// Validate unpacked file names as bank certificates
    #[arg(short, long)]
    pub certificates: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse a four-character bank code
fn parse_bank_code(s: &str) -> Result<String, String> {
    let s = s.trim();
    if s.chars().count() == 4 {
        Ok(s.to_string())
    } else {
        Err(format!("bank code must be exactly 4 characters: {s:?}"))
    }
}
