//! File entries and the strategies that construct them.
//!
//! An [`Entry`] describes one file by directory and bare name. Its validity
//! verdict is computed once, when the entry is built, by the construction
//! strategy ([`EntryKind`] or any [`EntryFactory`]).

pub mod certificate;

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use crate::error::ValidationError;

pub use certificate::CertificateName;
pub use certificate::CertificateState;

/// Closed set of built-in entry flavours.
///
/// # Examples
///
/// ```
/// use certpack_core::EntryKind;
///
/// let entry = EntryKind::Certificate.build("/inbox", "0646.11111111111.20220923174555.cer");
/// assert!(entry.is_valid());
/// assert_eq!(entry.certificate().map(|c| c.bank_code.as_str()), Some("0646"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKind {
    /// Any file; only directory and name must be non-empty.
    #[default]
    Basic,
    /// Bank certificate named `<bank>.<snils>.<YYYYMMDDhhmmss>.<cer|del>`.
    Certificate,
}

impl EntryKind {
    /// Builds an entry of this kind. Never fails.
    pub fn build(self, directory: impl Into<PathBuf>, name: impl Into<String>) -> Entry {
        match self {
            Self::Basic => Entry::new(directory, name),
            Self::Certificate => Entry::new_certificate(directory, name),
        }
    }
}

/// Strategy that turns a `(directory, name)` pair into an [`Entry`].
///
/// Implemented for [`EntryKind`] and for any `Fn(&Path, &str) -> Entry`, so
/// callers can plug in their own validators.
pub trait EntryFactory {
    /// Creates the entry. Must always return a value.
    fn create(&self, directory: &Path, name: &str) -> Entry;
}

impl EntryFactory for EntryKind {
    fn create(&self, directory: &Path, name: &str) -> Entry {
        self.build(directory, name)
    }
}

impl<F> EntryFactory for F
where
    F: Fn(&Path, &str) -> Entry,
{
    fn create(&self, directory: &Path, name: &str) -> Entry {
        self(directory, name)
    }
}

/// Immutable record describing one file.
///
/// # Examples
///
/// ```
/// use certpack_core::Entry;
/// use std::path::Path;
///
/// let entry = Entry::new("/inbox", "a.txt");
/// assert!(entry.is_valid());
/// assert_eq!(entry.full_path(), Path::new("/inbox/a.txt"));
///
/// let empty = Entry::new("/inbox", "");
/// assert!(!empty.is_valid());
/// assert!(!empty.message().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    directory: PathBuf,
    name: String,
    kind: EntryKind,
    certificate: Option<CertificateName>,
    problem: Option<ValidationError>,
    message: String,
}

impl Entry {
    /// Creates a basic entry.
    ///
    /// Invalid when `name` or `directory` is empty, valid otherwise.
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let directory = directory.into();
        let name = name.into();
        let verdict = check_location(&directory, &name).map(|()| String::new());
        Self::assemble(directory, name, EntryKind::Basic, None, verdict)
    }

    /// Creates a certificate entry, parsing the certificate fields out of
    /// `name`.
    ///
    /// The location checks of [`Entry::new`] run first; a valid certificate
    /// carries a summary of its fields as its message.
    pub fn new_certificate(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let directory = directory.into();
        let name = name.into();

        let parsed = check_location(&directory, &name).and_then(|()| CertificateName::parse(&name));
        match parsed {
            Ok(fields) => {
                let summary = fields.summary();
                Self::assemble(
                    directory,
                    name,
                    EntryKind::Certificate,
                    Some(fields),
                    Ok(summary),
                )
            }
            Err(problem) => {
                Self::assemble(directory, name, EntryKind::Certificate, None, Err(problem))
            }
        }
    }

    /// Creates a basic entry whose verdict was computed by the caller.
    ///
    /// The location checks of [`Entry::new`] still apply and take precedence
    /// over `verdict`.
    pub fn with_verdict(
        directory: impl Into<PathBuf>,
        name: impl Into<String>,
        verdict: std::result::Result<String, ValidationError>,
    ) -> Self {
        let directory = directory.into();
        let name = name.into();
        let verdict = check_location(&directory, &name).and(verdict);
        Self::assemble(directory, name, EntryKind::Basic, None, verdict)
    }

    pub(crate) fn invalid(
        directory: impl Into<PathBuf>,
        name: impl Into<String>,
        problem: ValidationError,
    ) -> Self {
        Self::assemble(directory.into(), name.into(), EntryKind::Basic, None, Err(problem))
    }

    fn assemble(
        directory: PathBuf,
        name: String,
        kind: EntryKind,
        certificate: Option<CertificateName>,
        verdict: std::result::Result<String, ValidationError>,
    ) -> Self {
        let (problem, message) = match verdict {
            Ok(message) => (None, message),
            Err(problem) => {
                let message = problem.to_string();
                (Some(problem), message)
            }
        };
        Self {
            directory,
            name,
            kind,
            certificate,
            problem,
            message,
        }
    }

    /// Directory containing the file.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Bare file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `directory` joined with `name`.
    #[must_use]
    pub fn full_path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// Strategy that built this entry.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Whether the entry passed validation.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.problem.is_none()
    }

    /// Human-readable validation outcome.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Why validation failed, if it did.
    #[must_use]
    pub const fn validation_error(&self) -> Option<&ValidationError> {
        self.problem.as_ref()
    }

    /// Parsed certificate fields, for valid certificate entries.
    #[must_use]
    pub const fn certificate(&self) -> Option<&CertificateName> {
        self.certificate.as_ref()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_path().display())
    }
}

fn check_location(directory: &Path, name: &str) -> std::result::Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if directory.as_os_str().is_empty() {
        return Err(ValidationError::EmptyDirectory);
    }
    Ok(())
}
