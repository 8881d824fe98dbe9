//! Error types for listing, packing and unpacking operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

use crate::entry::Entry;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Reasons an [`Entry`] can fail validation.
///
/// Validation never aborts entry construction; the error is stored on the
/// entry and rendered into its message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The file name is empty.
    #[error("file name must not be empty")]
    EmptyName,

    /// The directory is empty.
    #[error("file directory must not be empty")]
    EmptyDirectory,

    /// The file name is not valid UTF-8.
    #[error("file name is not valid UTF-8: {name}")]
    NonUtf8Name {
        /// Lossy rendering of the name.
        name: String,
    },

    /// The name refers to a directory or another non-regular file.
    #[error("{name} is not a regular file")]
    NotARegularFile {
        /// The offending name.
        name: String,
    },

    /// The file name does not have the four dot-separated certificate parts.
    #[error("{name} - file name does not match the certificate naming scheme")]
    MalformedName {
        /// The offending file name.
        name: String,
    },

    /// The expiry part is not a `YYYYMMDDhhmmss` timestamp.
    #[error("invalid expiry date: {value}")]
    InvalidExpiry {
        /// The raw expiry part.
        value: String,
    },

    /// The bank code is not exactly four characters.
    #[error("invalid bank code: {value}")]
    InvalidBankCode {
        /// The raw bank code part.
        value: String,
    },

    /// The SNILS is not exactly eleven characters.
    #[error("invalid SNILS: {value}")]
    InvalidSnils {
        /// The raw SNILS part.
        value: String,
    },

    /// The state tag is neither `cer` nor `del`.
    #[error("file is not a certificate: unknown state tag {value:?}")]
    NotACertificate {
        /// The raw state part.
        value: String,
    },

    /// Rejected by a caller-supplied validator.
    #[error("{reason}")]
    Rejected {
        /// Reason given by the validator.
        reason: String,
    },
}

/// Errors that can occur while listing, packing or unpacking files.
///
/// Every variant except [`ArchiveError::SourceCleanupFailed`] and
/// [`ArchiveError::ArchiveCleanupFailed`] guarantees that the failing call
/// left no partial output behind.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The source directory could not be listed.
    #[error("directory {} not found: {source}", path.display())]
    DirectoryNotFound {
        /// The directory that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archive to extract does not exist.
    #[error("archive {} not found", path.display())]
    ArchiveNotFound {
        /// The archive path.
        path: PathBuf,
    },

    /// The extraction destination does not exist or is not a directory.
    #[error("destination directory {} not found", path.display())]
    DestinationNotFound {
        /// The destination path.
        path: PathBuf,
    },

    /// Not enough permissions to create the archive or read a file.
    #[error("insufficient permissions for {}: {source}", path.display())]
    PermissionDenied {
        /// The path access was denied for.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A source file vanished before it could be written into the archive.
    #[error("file {name} not found in {}: {source}", directory.display())]
    SourceMissing {
        /// Bare name of the missing entry.
        name: String,
        /// Directory the entry was expected in.
        directory: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No entries were supplied, so the archive would be empty.
    #[error("archive {} is empty", path.display())]
    EmptyArchive {
        /// The archive path, already removed.
        path: PathBuf,
    },

    /// The archive could not be parsed.
    #[error("archive {} is unreadable, it may be corrupt: {reason}", path.display())]
    CorruptArchive {
        /// The archive path.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },

    /// A single archive member failed to extract; all prior members were
    /// removed again.
    #[error("failed to extract {entry} from archive {}: {reason}", archive.display())]
    ExtractionFailed {
        /// The archive path.
        archive: PathBuf,
        /// Name of the offending member.
        entry: String,
        /// What went wrong.
        reason: String,
    },

    /// The archive was created but a source file could not be removed.
    #[error("archive created but source file {} could not be deleted: {source}", path.display())]
    SourceCleanupFailed {
        /// The source file that is still present.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// All members were extracted but the archive could not be removed.
    #[error("archive {} was unpacked but could not be deleted: {source}", path.display())]
    ArchiveCleanupFailed {
        /// The archive that is still present.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Every extracted entry, all still on disk.
        entries: Vec<Entry>,
    },

    /// Writing the archive failed for a reason other than the ones above.
    #[error("failed to write archive {}: {source}", path.display())]
    ArchiveWrite {
        /// The archive path, already removed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Builder or extractor configuration is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Reason the configuration was rejected.
        reason: String,
    },
}

impl ArchiveError {
    /// Returns a stable, machine-readable code for this error kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use certpack_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::EmptyArchive {
    ///     path: PathBuf::from("out.zip"),
    /// };
    /// assert_eq!(err.code(), "EMPTY_ARCHIVE");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DirectoryNotFound { .. } => "DIRECTORY_NOT_FOUND",
            Self::ArchiveNotFound { .. } => "ARCHIVE_NOT_FOUND",
            Self::DestinationNotFound { .. } => "DESTINATION_NOT_FOUND",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::SourceMissing { .. } => "SOURCE_MISSING",
            Self::EmptyArchive { .. } => "EMPTY_ARCHIVE",
            Self::CorruptArchive { .. } => "CORRUPT_ARCHIVE",
            Self::ExtractionFailed { .. } => "EXTRACTION_FAILED",
            Self::SourceCleanupFailed { .. } => "SOURCE_CLEANUP_FAILED",
            Self::ArchiveCleanupFailed { .. } => "ARCHIVE_CLEANUP_FAILED",
            Self::ArchiveWrite { .. } => "ARCHIVE_WRITE",
            Self::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
        }
    }

    /// Returns `true` if the primary operation succeeded and only the
    /// optional cleanup step failed.
    ///
    /// For these errors the archive (or the extracted files) is complete and
    /// on disk. Whether that is a hard failure is left to the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use certpack_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::SourceCleanupFailed {
    ///     path: PathBuf::from("in/a.txt"),
    ///     source: std::io::Error::other("busy"),
    /// };
    /// assert!(err.is_cleanup_failure());
    ///
    /// let err = ArchiveError::ArchiveNotFound {
    ///     path: PathBuf::from("in.zip"),
    /// };
    /// assert!(!err.is_cleanup_failure());
    /// ```
    #[must_use]
    pub const fn is_cleanup_failure(&self) -> bool {
        matches!(
            self,
            Self::SourceCleanupFailed { .. } | Self::ArchiveCleanupFailed { .. }
        )
    }

    /// Returns the filesystem path this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::DirectoryNotFound { path, .. }
            | Self::ArchiveNotFound { path }
            | Self::DestinationNotFound { path }
            | Self::PermissionDenied { path, .. }
            | Self::EmptyArchive { path }
            | Self::CorruptArchive { path, .. }
            | Self::SourceCleanupFailed { path, .. }
            | Self::ArchiveCleanupFailed { path, .. }
            | Self::ArchiveWrite { path, .. } => Some(path),
            Self::SourceMissing { directory, .. } => Some(directory),
            Self::ExtractionFailed { archive, .. } => Some(archive),
            Self::InvalidConfiguration { .. } => None,
        }
    }

    /// Emits the error as a `tracing` event and returns it unchanged.
    pub(crate) fn logged(self) -> Self {
        tracing::error!(code = self.code(), "{self}");
        self
    }

    /// Consumes the error and returns the entries that are on disk despite
    /// the failure.
    ///
    /// Only [`ArchiveError::ArchiveCleanupFailed`] carries entries; every
    /// other kind returns an empty list.
    #[must_use]
    pub fn into_entries(self) -> Vec<Entry> {
        match self {
            Self::ArchiveCleanupFailed { entries, .. } => entries,
            _ => Vec::new(),
        }
    }
}
