//! Pack command implementation

use super::open_container;
use super::retain_bank_code;
use super::split_archive_path;
use crate::cli::PackArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use certpack_core::ArchiveBuilder;

pub fn execute(args: &PackArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let container = open_container(&args.directory, args.certificates)?;

    let mut entries = container.ready();
    retain_bank_code(&mut entries, args.bank_code.as_deref());

    let skipped = container.len() - entries.len();
    if skipped > 0 {
        formatter.format_warning(&format!(
            "{skipped} of {} file(s) skipped (locked, invalid or filtered out)",
            container.len()
        ));
    }

    let (path, name) = split_archive_path(&args.archive)?;
    let mut builder = ArchiveBuilder::new(path, name).delete_sources(args.delete_sources);
    if let Some(level) = args.compression_level {
        builder = builder.compression_level(level);
    }

    let report = add_archive_context(builder.build(entries))?;
    formatter.format_pack_result(&report)
}
