//! All-or-nothing archive extractor.

use std::fs;
use std::fs::File;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use zip::ZipArchive;

use crate::ArchiveError;
use crate::Result;
use crate::entry::Entry;
use crate::entry::EntryKind;
use crate::extraction::atomic::ExtractedFiles;
use crate::extraction::atomic::stage_file;
use crate::extraction::config::ExtractConfig;
use crate::extraction::report::ExtractReport;

/// Unpacks `path/name` into a destination directory.
///
/// Members are extracted in archive order. If any member fails, every file
/// written by this call is removed before the error is returned, so the
/// destination looks exactly as before. Only flat archives are supported:
/// members must be bare file names.
///
/// # Examples
///
/// ```no_run
/// use certpack_core::ArchiveExtractor;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = ArchiveExtractor::new("/var/spool/outbox", "batch.zip", "/var/spool/certs")
///     .delete_archive(true)
///     .extract()?;
/// for entry in &report.entries {
///     println!("{entry}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveExtractor {
    path: PathBuf,
    name: String,
    destination: PathBuf,
    config: ExtractConfig,
}

/// Why a single member could not be extracted.
struct MemberFailure {
    entry: String,
    reason: String,
}

impl MemberFailure {
    fn new(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            reason: reason.into(),
        }
    }
}

impl ArchiveExtractor {
    /// Creates an extractor for archive `name` in directory `path`, writing
    /// into `destination`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            destination: destination.into(),
            config: ExtractConfig::default(),
        }
    }

    /// Sets the full configuration.
    #[must_use]
    pub fn config(mut self, config: ExtractConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets whether the archive is deleted after a successful extraction.
    #[must_use]
    pub fn delete_archive(mut self, delete: bool) -> Self {
        self.config.delete_archive = delete;
        self
    }

    /// Sets the flavour of the entries built for extracted files.
    #[must_use]
    pub fn entry_kind(mut self, kind: EntryKind) -> Self {
        self.config.entry_kind = kind;
        self
    }

    /// Full path of the archive this extractor reads.
    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        self.path.join(&self.name)
    }

    /// The destination directory.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Extracts every member of the archive.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::ArchiveNotFound`] / [`ArchiveError::DestinationNotFound`]:
    ///   nothing attempted
    /// - [`ArchiveError::PermissionDenied`]: the archive cannot be opened
    /// - [`ArchiveError::CorruptArchive`]: the archive cannot be parsed,
    ///   nothing written
    /// - [`ArchiveError::ExtractionFailed`]: a member failed, every file
    ///   extracted so far was removed
    /// - [`ArchiveError::ArchiveCleanupFailed`]: all members are on disk but
    ///   the archive could not be deleted; the error carries the entries
    pub fn extract(&self) -> Result<ExtractReport> {
        let start = Instant::now();
        let archive_path = self.archive_path();

        if !archive_path.is_file() {
            return Err(ArchiveError::ArchiveNotFound { path: archive_path }.logged());
        }
        if !self.destination.is_dir() {
            return Err(ArchiveError::DestinationNotFound {
                path: self.destination.clone(),
            }
            .logged());
        }

        let file = File::open(&archive_path).map_err(|e| {
            let err = if e.kind() == io::ErrorKind::PermissionDenied {
                ArchiveError::PermissionDenied {
                    path: archive_path.clone(),
                    source: e,
                }
            } else {
                ArchiveError::CorruptArchive {
                    path: archive_path.clone(),
                    reason: e.to_string(),
                }
            };
            err.logged()
        })?;

        let mut archive = ZipArchive::new(file).map_err(|e| {
            ArchiveError::CorruptArchive {
                path: archive_path.clone(),
                reason: e.to_string(),
            }
            .logged()
        })?;

        let mut extracted = ExtractedFiles::new();
        let mut names = Vec::with_capacity(archive.len());
        let mut bytes_written = 0;
        for index in 0..archive.len() {
            match extract_member(&mut archive, index, &self.destination) {
                Ok((path, name, bytes)) => {
                    tracing::debug!(
                        entry = %name,
                        destination = %self.destination.display(),
                        bytes,
                        "extracted file"
                    );
                    extracted.record(path);
                    names.push(name);
                    bytes_written += bytes;
                }
                Err(failure) => {
                    extracted.rollback();
                    return Err(ArchiveError::ExtractionFailed {
                        archive: archive_path,
                        entry: failure.entry,
                        reason: failure.reason,
                    }
                    .logged());
                }
            }
        }
        drop(archive);
        extracted.commit();

        let entries: Vec<Entry> = names
            .into_iter()
            .map(|name| self.config.entry_kind.build(&self.destination, name))
            .collect();

        let mut report = ExtractReport {
            archive_path: archive_path.clone(),
            destination: self.destination.clone(),
            entries,
            bytes_written,
            ..ExtractReport::default()
        };

        if self.config.delete_archive {
            if let Err(e) = fs::remove_file(&archive_path) {
                return Err(ArchiveError::ArchiveCleanupFailed {
                    path: archive_path,
                    source: e,
                    entries: report.entries,
                }
                .logged());
            }
            report.archive_deleted = true;
        }

        report.duration = start.elapsed();
        tracing::info!(
            archive = %archive_path.display(),
            files = report.files_extracted(),
            "{}",
            report.message()
        );
        Ok(report)
    }
}

fn extract_member(
    archive: &mut ZipArchive<File>,
    index: usize,
    destination: &Path,
) -> std::result::Result<(PathBuf, String, u64), MemberFailure> {
    let mut member = archive
        .by_index(index)
        .map_err(|e| MemberFailure::new(format!("#{index}"), e.to_string()))?;
    let raw_name = member.name().to_string();

    if member.is_dir() {
        return Err(MemberFailure::new(
            raw_name,
            "directory entries are not supported",
        ));
    }
    let name = member
        .enclosed_name()
        .as_deref()
        .and_then(bare_name)
        .ok_or_else(|| MemberFailure::new(&raw_name, "entry name is not a bare file name"))?;

    let mode = member.unix_mode();
    let (path, bytes) = stage_file(&mut member, destination, &name, mode).map_err(|e| {
        let reason = if e.kind() == io::ErrorKind::AlreadyExists {
            "a file with this name already exists in the destination".to_string()
        } else {
            e.to_string()
        };
        MemberFailure::new(&raw_name, reason)
    })?;
    Ok((path, name, bytes))
}

/// Returns the name if `path` is a single normal component.
fn bare_name(path: &Path) -> Option<String> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => name.to_str().map(str::to_string),
        _ => None,
    }
}
