//! Unpack command implementation

use super::split_archive_path;
use crate::cli::UnpackArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use certpack_core::ArchiveExtractor;
use certpack_core::EntryKind;

pub fn execute(args: &UnpackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let (path, name) = split_archive_path(&args.archive)?;
    let kind = if args.certificates {
        EntryKind::Certificate
    } else {
        EntryKind::Basic
    };

    let extractor = ArchiveExtractor::new(path, name, &args.destination)
        .delete_archive(args.delete_archive)
        .entry_kind(kind);

    let report = add_archive_context(extractor.extract())?;
    formatter.format_unpack_result(&report)
}
