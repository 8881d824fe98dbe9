//! Subcommand implementations.

pub mod completion;
pub mod list;
pub mod pack;
pub mod unpack;

use crate::error::add_archive_context;
use anyhow::Context;
use anyhow::Result;
use certpack_core::Entry;
use certpack_core::EntryContainer;
use std::path::Path;
use std::path::PathBuf;

/// Lists `directory` as basic or certificate entries.
pub fn open_container(directory: &Path, certificates: bool) -> Result<EntryContainer> {
    let container = if certificates {
        EntryContainer::certificates(directory)
    } else {
        EntryContainer::open(directory)
    };
    add_archive_context(container)
}

/// Keeps only certificates issued by `bank_code`, if one was given.
pub fn retain_bank_code(entries: &mut Vec<&Entry>, bank_code: Option<&str>) {
    if let Some(code) = bank_code {
        entries.retain(|entry| {
            entry
                .certificate()
                .is_some_and(|cert| cert.bank_code == code)
        });
    }
}

/// Splits an archive path into its directory and file name.
///
/// A bare file name resolves against the current directory.
pub fn split_archive_path(archive: &Path) -> Result<(PathBuf, String)> {
    let name = archive
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("'{}' does not name an archive file", archive.display()))?
        .to_string();
    let directory = match archive.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, name))
}
