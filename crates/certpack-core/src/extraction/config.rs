//! Extraction configuration.

use crate::entry::EntryKind;

/// Configuration for [`ArchiveExtractor`](super::ArchiveExtractor).
///
/// # Examples
///
/// ```
/// use certpack_core::ExtractConfig;
///
/// let config = ExtractConfig::default().with_delete_archive(true);
/// assert!(config.delete_archive);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Remove the archive after every member was extracted.
    ///
    /// Default: `false`
    pub delete_archive: bool,

    /// Flavour of the entries built for extracted files.
    ///
    /// Default: [`EntryKind::Basic`]
    pub entry_kind: EntryKind,
}

impl ExtractConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the archive is deleted after a successful extraction.
    #[must_use]
    pub fn with_delete_archive(mut self, delete: bool) -> Self {
        self.delete_archive = delete;
        self
    }

    /// Sets the flavour of the entries built for extracted files.
    #[must_use]
    pub fn with_entry_kind(mut self, kind: EntryKind) -> Self {
        self.entry_kind = kind;
        self
    }
}
