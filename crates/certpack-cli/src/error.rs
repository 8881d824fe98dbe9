//! Error conversion utilities for CLI.
//!
//! Converts certpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use certpack_core::ArchiveError;

/// Converts `ArchiveError` to user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError) -> anyhow::Error {
    match err {
        ArchiveError::DirectoryNotFound { path, source } => {
            anyhow!(
                "Cannot list directory '{}': {source}\n\
                 HINT: Check that the path exists and is a readable directory.",
                path.display()
            )
        }
        ArchiveError::ArchiveNotFound { path } => {
            anyhow!("Archive '{}' not found", path.display())
        }
        ArchiveError::DestinationNotFound { path } => {
            anyhow!(
                "Destination directory '{}' not found\n\
                 HINT: Create the destination directory before unpacking.",
                path.display()
            )
        }
        ArchiveError::PermissionDenied { path, source } => {
            anyhow!(
                "Permission denied for '{}': {source}\n\
                 HINT: Check ownership and permissions of the file and its directory.",
                path.display()
            )
        }
        ArchiveError::SourceMissing {
            name, directory, ..
        } => {
            anyhow!(
                "File '{name}' disappeared from '{}' while packing, no archive was written\n\
                 HINT: Another process may be consuming the directory. Retry the pack.",
                directory.display()
            )
        }
        ArchiveError::EmptyArchive { path } => {
            anyhow!(
                "Nothing to pack into '{}'\n\
                 HINT: Only unlocked and valid files are packed. \
                 Run `certpack list --unlocked --valid` to see them.",
                path.display()
            )
        }
        ArchiveError::CorruptArchive { path, reason } => {
            anyhow!(
                "Invalid archive '{}': {reason}\n\
                 HINT: The archive may be corrupted or not a zip file.",
                path.display()
            )
        }
        ArchiveError::ExtractionFailed {
            archive,
            entry,
            reason,
        } => {
            anyhow!(
                "Failed to unpack '{entry}' from '{}': {reason}\n\
                 HINT: Files unpacked before the failure were removed again.",
                archive.display()
            )
        }
        ArchiveError::SourceCleanupFailed { path, source } => {
            anyhow!(
                "Archive created, but source file '{}' could not be deleted: {source}\n\
                 HINT: The archive is complete. Remove the remaining sources manually.",
                path.display()
            )
        }
        ArchiveError::ArchiveCleanupFailed {
            path,
            source,
            entries,
        } => {
            anyhow!(
                "Unpacked {} file(s), but archive '{}' could not be deleted: {source}\n\
                 HINT: The unpacked files are complete. Remove the archive manually.",
                entries.len(),
                path.display()
            )
        }
        _ => anyhow::Error::from(err),
    }
}

/// Converts a core result into an anyhow result
pub fn add_archive_context<T>(result: certpack_core::Result<T>) -> anyhow::Result<T> {
    result.map_err(convert_archive_error)
}
