//! Archive build reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of a successful archive build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Path of the created archive.
    pub archive_path: PathBuf,

    /// Number of files written into the archive.
    pub files_added: usize,

    /// Total uncompressed bytes read from the sources.
    pub bytes_written: u64,

    /// Size of the finished archive on disk.
    pub bytes_compressed: u64,

    /// Whether the source files were removed.
    pub sources_deleted: bool,

    /// Duration of the build.
    pub duration: Duration,
}

impl BuildReport {
    /// Composes the human-readable outcome of the build.
    ///
    /// # Examples
    ///
    /// ```
    /// use certpack_core::creation::BuildReport;
    /// use std::path::PathBuf;
    ///
    /// let report = BuildReport {
    ///     archive_path: PathBuf::from("/out/batch.zip"),
    ///     files_added: 2,
    ///     ..BuildReport::default()
    /// };
    /// assert_eq!(
    ///     report.message(),
    ///     "/out/batch.zip - archive with 2 file(s) created in /out. Source files were kept"
    /// );
    /// ```
    #[must_use]
    pub fn message(&self) -> String {
        let location = self
            .archive_path
            .parent()
            .map(|dir| dir.display().to_string())
            .unwrap_or_default();
        let sources = if self.sources_deleted {
            "All source files were deleted"
        } else {
            "Source files were kept"
        };
        format!(
            "{} - archive with {} file(s) created in {location}. {sources}",
            self.archive_path.display(),
            self.files_added,
        )
    }

    /// Returns the compression ratio (uncompressed / compressed).
    ///
    /// Returns 0.0 if either size is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.bytes_compressed as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_sources_deleted() {
        let report = BuildReport {
            archive_path: PathBuf::from("/out/batch.zip"),
            files_added: 3,
            sources_deleted: true,
            ..BuildReport::default()
        };
        let message = report.message();
        assert!(message.starts_with("/out/batch.zip"));
        assert!(message.contains("3 file(s)"));
        assert!(message.ends_with("All source files were deleted"));
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_compression_ratio() {
        let mut report = BuildReport {
            bytes_written: 1000,
            bytes_compressed: 250,
            ..BuildReport::default()
        };
        assert_eq!(report.compression_ratio(), 4.0);

        report.bytes_compressed = 0;
        assert_eq!(report.compression_ratio(), 0.0);
    }
}
