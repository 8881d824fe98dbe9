//! Extraction reporting.

use std::path::PathBuf;
use std::time::Duration;

use crate::entry::Entry;

/// Report of a successful extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractReport {
    /// Path of the source archive.
    pub archive_path: PathBuf,

    /// Directory the members were written to.
    pub destination: PathBuf,

    /// One entry per extracted file, in archive order.
    pub entries: Vec<Entry>,

    /// Total bytes written to the destination.
    pub bytes_written: u64,

    /// Whether the archive was removed afterwards.
    pub archive_deleted: bool,

    /// Duration of the extraction.
    pub duration: Duration,
}

impl ExtractReport {
    /// Number of extracted files.
    #[must_use]
    pub fn files_extracted(&self) -> usize {
        self.entries.len()
    }

    /// Composes the human-readable outcome of the extraction.
    ///
    /// # Examples
    ///
    /// ```
    /// use certpack_core::ExtractReport;
    /// use std::path::PathBuf;
    ///
    /// let report = ExtractReport {
    ///     archive_path: PathBuf::from("/in/batch.zip"),
    ///     destination: PathBuf::from("/out"),
    ///     ..ExtractReport::default()
    /// };
    /// assert_eq!(
    ///     report.message(),
    ///     "batch.zip - archive unpacked to /out. Archive batch.zip was kept"
    /// );
    /// ```
    #[must_use]
    pub fn message(&self) -> String {
        let name = self
            .archive_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let fate = if self.archive_deleted {
            "was deleted"
        } else {
            "was kept"
        };
        format!(
            "{name} - archive unpacked to {}. Archive {name} {fate}",
            self.destination.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_archive_deleted() {
        let report = ExtractReport {
            archive_path: PathBuf::from("/in/batch.zip"),
            destination: PathBuf::from("/out"),
            entries: vec![Entry::new("/out", "a.txt")],
            archive_deleted: true,
            ..ExtractReport::default()
        };
        assert_eq!(
            report.message(),
            "batch.zip - archive unpacked to /out. Archive batch.zip was deleted"
        );
        assert_eq!(report.files_extracted(), 1);
    }
}
