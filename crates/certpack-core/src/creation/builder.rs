//! All-or-nothing archive builder.

use std::fs;
use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use zip::ZipWriter;

use crate::ArchiveError;
use crate::Result;
use crate::creation::config::BuildConfig;
use crate::creation::report::BuildReport;
use crate::creation::zip::append_entry;
use crate::creation::zip::deflate_options;
use crate::creation::zip::finish;
use crate::entry::Entry;

/// Packs entries into a zip archive at `path/name`.
///
/// The build runs in fixed steps and stops at the first failure:
///
/// 1. create the archive file
/// 2. append every entry in order, under its bare name
/// 3. refuse an archive with no entries
/// 4. optionally delete the sources
///
/// Any failure in steps 1-3 removes the archive before returning, so callers
/// never observe a partial archive. A failure in step 4 leaves the complete
/// archive in place and is reported as
/// [`ArchiveError::SourceCleanupFailed`].
///
/// # Examples
///
/// ```no_run
/// use certpack_core::ArchiveBuilder;
/// use certpack_core::EntryContainer;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let inbox = EntryContainer::certificates("/var/spool/certs")?;
/// let report = ArchiveBuilder::new("/var/spool/outbox", "batch.zip")
///     .delete_sources(true)
///     .build(inbox.ready())?;
/// println!("{}", report.message());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    path: PathBuf,
    name: String,
    config: BuildConfig,
}

impl ArchiveBuilder {
    /// Creates a builder for the archive `name` inside directory `path`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            config: BuildConfig::default(),
        }
    }

    /// Sets the full configuration.
    #[must_use]
    pub fn config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the compression level (1-9).
    #[must_use]
    pub fn compression_level(mut self, level: u8) -> Self {
        self.config.compression_level = Some(level);
        self
    }

    /// Sets whether source files are deleted after a successful build.
    #[must_use]
    pub fn delete_sources(mut self, delete: bool) -> Self {
        self.config.delete_sources = delete;
        self
    }

    /// Full path of the archive this builder writes.
    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        self.path.join(&self.name)
    }

    /// Builds the archive from `entries`.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::InvalidConfiguration`]: configuration rejected, nothing
    ///   created
    /// - [`ArchiveError::PermissionDenied`]: the archive cannot be created, or
    ///   a source cannot be read
    /// - [`ArchiveError::SourceMissing`]: a source file vanished
    /// - [`ArchiveError::EmptyArchive`]: `entries` was empty
    /// - [`ArchiveError::ArchiveWrite`]: any other write failure
    /// - [`ArchiveError::SourceCleanupFailed`]: the archive is complete but a
    ///   source could not be deleted
    pub fn build<'a, I>(&self, entries: I) -> Result<BuildReport>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let start = Instant::now();
        self.config.validate().map_err(ArchiveError::logged)?;

        let archive_path = self.archive_path();
        let entries: Vec<&Entry> = entries.into_iter().collect();

        let file = File::create(&archive_path).map_err(|e| {
            let err = if e.kind() == io::ErrorKind::PermissionDenied {
                ArchiveError::PermissionDenied {
                    path: archive_path.clone(),
                    source: e,
                }
            } else {
                ArchiveError::ArchiveWrite {
                    path: archive_path.clone(),
                    source: e,
                }
            };
            err.logged()
        })?;

        let mut report = BuildReport {
            archive_path: archive_path.clone(),
            ..BuildReport::default()
        };

        let mut zip = ZipWriter::new(file);
        let options = deflate_options(self.config.level());
        for entry in &entries {
            match append_entry(&mut zip, entry, options, &archive_path) {
                Ok(bytes) => {
                    report.files_added += 1;
                    report.bytes_written += bytes;
                    tracing::debug!(
                        entry = entry.name(),
                        archive = %archive_path.display(),
                        bytes,
                        "added file to archive"
                    );
                }
                Err(err) => {
                    drop(zip);
                    discard_archive(&archive_path);
                    return Err(err.logged());
                }
            }
        }

        let file = match finish(zip, &archive_path) {
            Ok(file) => file,
            Err(err) => {
                discard_archive(&archive_path);
                return Err(err.logged());
            }
        };
        report.bytes_compressed = file.metadata().map(|m| m.len()).unwrap_or_default();
        drop(file);

        if report.files_added == 0 {
            discard_archive(&archive_path);
            return Err(ArchiveError::EmptyArchive { path: archive_path }.logged());
        }

        if self.config.delete_sources {
            for entry in &entries {
                let source_path = entry.full_path();
                fs::remove_file(&source_path).map_err(|e| {
                    ArchiveError::SourceCleanupFailed {
                        path: source_path.clone(),
                        source: e,
                    }
                    .logged()
                })?;
                tracing::debug!(source = %source_path.display(), "deleted source file");
            }
            report.sources_deleted = true;
        }

        report.duration = start.elapsed();
        tracing::info!(
            archive = %archive_path.display(),
            files = report.files_added,
            "{}",
            report.message()
        );
        Ok(report)
    }
}

/// Removes a partially written archive.
fn discard_archive(archive_path: &Path) {
    if let Err(e) = fs::remove_file(archive_path) {
        tracing::warn!(
            archive = %archive_path.display(),
            error = %e,
            "failed to remove partial archive"
        );
    }
}
