//! List command implementation

use super::open_container;
use super::retain_bank_code;
use crate::cli::ListArgs;
use crate::output::OutputFormatter;
use anyhow::Result;
use certpack_core::Entry;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let container = open_container(&args.directory, args.certificates)?;

    let mut entries: Vec<&Entry> = if args.unlocked {
        container.unlocked()
    } else {
        container.entries().iter().collect()
    };
    if args.valid {
        entries.retain(|entry| entry.is_valid());
    }
    retain_bank_code(&mut entries, args.bank_code.as_deref());

    tracing::debug!(
        listed = container.len(),
        shown = entries.len(),
        "filtered directory listing"
    );
    formatter.format_entries(container.directory(), &entries)
}
