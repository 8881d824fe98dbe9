//! Configuration for archive building.

use crate::ArchiveError;
use crate::Result;

/// Default DEFLATE level, balanced between speed and size.
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

/// Configuration for building an archive.
///
/// # Examples
///
/// ```
/// use certpack_core::creation::BuildConfig;
///
/// let config = BuildConfig::default()
///     .with_compression_level(9)
///     .with_delete_sources(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// DEFLATE compression level (1-9).
    ///
    /// `None` uses [`DEFAULT_COMPRESSION_LEVEL`].
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Remove the source files once the archive is complete.
    ///
    /// Default: `false`.
    pub delete_sources: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compression_level: Some(DEFAULT_COMPRESSION_LEVEL),
            delete_sources: false,
        }
    }
}

impl BuildConfig {
    /// Creates a new `BuildConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    ///
    /// Out-of-range levels are reported by [`BuildConfig::validate`].
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets whether sources are deleted after a successful build.
    #[must_use]
    pub fn with_delete_sources(mut self, delete: bool) -> Self {
        self.delete_sources = delete;
        self
    }

    /// The effective compression level.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.compression_level.unwrap_or(DEFAULT_COMPRESSION_LEVEL)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidConfiguration`] if the compression level
    /// is set but not in range 1-9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(ArchiveError::InvalidConfiguration {
                reason: format!("compression level must be 1-9, got {level}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BuildConfig::default();
        assert_eq!(config.compression_level, Some(6));
        assert!(!config.delete_sources);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = BuildConfig::new()
            .with_compression_level(1)
            .with_delete_sources(true);
        assert_eq!(config.level(), 1);
        assert!(config.delete_sources);
    }

    #[test]
    fn test_level_fallback() {
        let config = BuildConfig {
            compression_level: None,
            ..BuildConfig::default()
        };
        assert_eq!(config.level(), DEFAULT_COMPRESSION_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        for level in [0, 10, 255] {
            let config = BuildConfig::default().with_compression_level(level);
            assert!(matches!(
                config.validate(),
                Err(ArchiveError::InvalidConfiguration { .. })
            ));
        }
    }
}
