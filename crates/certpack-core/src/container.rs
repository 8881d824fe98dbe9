//! Directory listings as typed entries.

use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::entry::Entry;
use crate::entry::EntryFactory;
use crate::entry::EntryKind;
use crate::error::ArchiveError;
use crate::error::Result;
use crate::error::ValidationError;
use crate::lock::LockProbe;
use crate::lock::default_probe;

/// The files of one directory, listed once at construction.
///
/// Entries keep the order in which the filesystem listed them; that order is
/// not sorted. Every filter returns borrowed entries in that same order.
///
/// # Examples
///
/// ```no_run
/// use certpack_core::EntryContainer;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let inbox = EntryContainer::certificates("/var/spool/certs")?;
/// for entry in inbox.ready() {
///     println!("{}: {}", entry.name(), entry.message());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EntryContainer {
    directory: PathBuf,
    entries: Vec<Entry>,
}

impl EntryContainer {
    /// Lists `directory` as basic entries.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::DirectoryNotFound`] if the directory cannot be
    /// listed.
    pub fn open<P: AsRef<Path>>(directory: P) -> Result<Self> {
        Self::open_with(directory, &EntryKind::Basic)
    }

    /// Lists `directory` as certificate entries.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::DirectoryNotFound`] if the directory cannot be
    /// listed.
    pub fn certificates<P: AsRef<Path>>(directory: P) -> Result<Self> {
        Self::open_with(directory, &EntryKind::Certificate)
    }

    /// Lists `directory`, building each entry with `factory`.
    ///
    /// The listing is not recursive. Subdirectories and other non-regular
    /// files are listed as invalid entries, so they never reach the
    /// `valid`/`ready` subsets.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::DirectoryNotFound`] if the directory does not
    /// exist, is not a directory, or cannot be read.
    pub fn open_with<P, F>(directory: P, factory: &F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: EntryFactory + ?Sized,
    {
        let directory = directory.as_ref().to_path_buf();
        ensure_directory(&directory)?;

        let mut entries = Vec::new();
        for item in WalkDir::new(&directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let item = item.map_err(|e| listing_failed(&directory, e.into()))?;
            let regular = item.file_type().is_file()
                || (item.path_is_symlink() && item.path().is_file());
            let entry = match item.file_name().to_str() {
                Some(name) if regular => factory.create(&directory, name),
                Some(name) => Entry::invalid(
                    &directory,
                    name,
                    ValidationError::NotARegularFile { name: name.to_string() },
                ),
                None => {
                    let name = item.file_name().to_string_lossy().into_owned();
                    Entry::invalid(&directory, name.clone(), ValidationError::NonUtf8Name { name })
                }
            };
            entries.push(entry);
        }

        tracing::debug!(
            directory = %directory.display(),
            entries = entries.len(),
            "listed directory"
        );
        Ok(Self { directory, entries })
    }

    /// The listed directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// All entries, in listing order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of listed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the container and returns its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Entries not currently held open by another process, checked with the
    /// platform's [`default_probe`].
    #[must_use]
    pub fn unlocked(&self) -> Vec<&Entry> {
        self.unlocked_with(&*default_probe())
    }

    /// Entries that `probe` reports as unlocked.
    pub fn unlocked_with<L: LockProbe + ?Sized>(&self, probe: &L) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|entry| {
                let locked = probe.is_locked(&entry.full_path());
                if locked {
                    tracing::debug!(entry = %entry, "skipping locked file");
                }
                !locked
            })
            .collect()
    }

    /// Entries that passed validation.
    #[must_use]
    pub fn valid(&self) -> Vec<&Entry> {
        self.entries.iter().filter(|entry| entry.is_valid()).collect()
    }

    /// Entries that are both unlocked and valid; safe to pack.
    #[must_use]
    pub fn ready(&self) -> Vec<&Entry> {
        self.ready_with(&*default_probe())
    }

    /// Like [`EntryContainer::ready`] with an explicit probe.
    pub fn ready_with<L: LockProbe + ?Sized>(&self, probe: &L) -> Vec<&Entry> {
        self.unlocked_with(probe)
            .into_iter()
            .filter(|entry| entry.is_valid())
            .collect()
    }

    /// Entries matching `predicate`, drawn from the valid entries only or from
    /// all entries.
    pub fn by_predicate<F>(&self, predicate: F, only_valid: bool) -> Vec<&Entry>
    where
        F: Fn(&Entry) -> bool,
    {
        self.entries
            .iter()
            .filter(|entry| !only_valid || entry.is_valid())
            .filter(|entry| predicate(entry))
            .collect()
    }

    /// Certificate entries issued by `bank_code`.
    ///
    /// Entries without parsed certificate fields never match.
    #[must_use]
    pub fn by_bank_code(&self, bank_code: &str, only_valid: bool) -> Vec<&Entry> {
        self.by_predicate(
            |entry| {
                entry
                    .certificate()
                    .is_some_and(|cert| cert.bank_code == bank_code)
            },
            only_valid,
        )
    }
}

impl<'a> IntoIterator for &'a EntryContainer {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn ensure_directory(directory: &Path) -> Result<()> {
    match std::fs::metadata(directory) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(listing_failed(
            directory,
            std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        )),
        Err(e) => Err(listing_failed(directory, e)),
    }
}

fn listing_failed(directory: &Path, source: std::io::Error) -> ArchiveError {
    ArchiveError::DirectoryNotFound {
        path: directory.to_path_buf(),
        source,
    }
    .logged()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::lock::FixedLocks;
    use crate::lock::NeverLocked;
    use crate::test_utils::write_files;
    use tempfile::TempDir;

    const CERTIFICATES: [&str; 8] = [
        "dddddd",
        "0648.11111111111.20220923174555.zzz",
        "0646.11111111111.20241323174555.cer",
        "0646.11111111111.202413231745.cer",
        "8754.11111111111.2021z812143545.cer",
        "0647.11111111111.20220923174555.del",
        "0646.11111111111.20220923174555.cer",
        "0645.11111111111.20220923174555.cer",
    ];

    fn names(entries: &[&Entry]) -> Vec<String> {
        let mut names: Vec<String> = entries.iter().map(|e| e.name().to_string()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_open_lists_all_files() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &[("a.txt", b"a"), ("b.txt", b"b")]);

        let container = EntryContainer::open(temp.path()).unwrap();
        assert_eq!(container.len(), 2);
        assert!(!container.is_empty());
        assert_eq!(container.directory(), temp.path());
        assert!(container.entries().iter().all(Entry::is_valid));
        assert!(
            container
                .entries()
                .iter()
                .all(|e| e.directory() == temp.path())
        );
    }

    #[test]
    fn test_open_empty_directory() {
        let temp = TempDir::new().unwrap();
        let container = EntryContainer::open(temp.path()).unwrap();
        assert!(container.is_empty());
        assert!(container.valid().is_empty());
    }

    #[test]
    fn test_open_missing_directory() {
        let temp = TempDir::new().unwrap();
        let result = EntryContainer::open(temp.path().join("missing"));
        assert!(matches!(
            result,
            Err(ArchiveError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_open_file_instead_of_directory() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &[("plain.txt", b"x")]);
        let result = EntryContainer::open(temp.path().join("plain.txt"));
        assert!(matches!(
            result,
            Err(ArchiveError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_listing_is_not_recursive() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("nested")).unwrap();
        write_files(&temp.path().join("nested"), &[("deep.txt", b"x")]);
        write_files(temp.path(), &[("top.txt", b"x")]);

        let container = EntryContainer::open(temp.path()).unwrap();
        let all: Vec<&Entry> = container.entries().iter().collect();
        assert_eq!(names(&all), vec!["nested", "top.txt"]);
    }

    #[test]
    fn test_subdirectory_is_listed_invalid() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        write_files(temp.path(), &[("a.txt", b"a")]);

        let container = EntryContainer::open(temp.path()).unwrap();
        assert_eq!(container.len(), 2);
        assert_eq!(names(&container.valid()), vec!["a.txt"]);
        assert_eq!(names(&container.ready_with(&NeverLocked)), vec!["a.txt"]);

        let sub = container
            .entries()
            .iter()
            .find(|e| e.name() == "sub")
            .unwrap();
        assert!(matches!(
            sub.validation_error(),
            Some(ValidationError::NotARegularFile { .. })
        ));
        assert!(sub.message().contains("not a regular file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_file_is_valid() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &[("target.txt", b"x")]);
        std::os::unix::fs::symlink(
            temp.path().join("target.txt"),
            temp.path().join("link.txt"),
        )
        .unwrap();

        let container = EntryContainer::open(temp.path()).unwrap();
        assert_eq!(names(&container.valid()), vec!["link.txt", "target.txt"]);
    }

    #[test]
    fn test_certificates_valid_subset() {
        let temp = TempDir::new().unwrap();
        let files: Vec<(&str, &[u8])> = CERTIFICATES
            .iter()
            .map(|name| (*name, b"Some comment".as_slice()))
            .collect();
        write_files(temp.path(), &files);

        let container = EntryContainer::certificates(temp.path()).unwrap();
        assert_eq!(container.len(), 8);
        assert_eq!(
            names(&container.valid()),
            vec![
                "0645.11111111111.20220923174555.cer",
                "0646.11111111111.20220923174555.cer",
                "0647.11111111111.20220923174555.del",
            ]
        );
    }

    #[test]
    fn test_by_bank_code() {
        let temp = TempDir::new().unwrap();
        let files: Vec<(&str, &[u8])> = CERTIFICATES
            .iter()
            .map(|name| (*name, b"x".as_slice()))
            .collect();
        write_files(temp.path(), &files);

        let container = EntryContainer::certificates(temp.path()).unwrap();
        let matched = container.by_bank_code("0646", true);
        assert_eq!(names(&matched), vec!["0646.11111111111.20220923174555.cer"]);

        // Invalid certificates carry no parsed fields
        assert!(container.by_bank_code("0648", false).is_empty());
        assert!(container.by_bank_code("9999", false).is_empty());
    }

    #[test]
    fn test_by_predicate_only_valid_switch() {
        let temp = TempDir::new().unwrap();
        write_files(
            temp.path(),
            &[
                ("0646.11111111111.20220923174555.cer", b"x"),
                ("0646.bad", b"x"),
            ],
        );

        let container = EntryContainer::certificates(temp.path()).unwrap();
        let starts_0646 = |entry: &Entry| entry.name().starts_with("0646");
        assert_eq!(container.by_predicate(starts_0646, true).len(), 1);
        assert_eq!(container.by_predicate(starts_0646, false).len(), 2);
    }

    #[test]
    fn test_unlocked_with_fixed_locks() {
        let temp = TempDir::new().unwrap();
        write_files(
            temp.path(),
            &[("a.txt", b"a"), ("b.txt", b"b"), ("c.txt", b"c")],
        );

        let container = EntryContainer::open(temp.path()).unwrap();
        let probe = FixedLocks::new([temp.path().join("b.txt")]);
        assert_eq!(
            names(&container.unlocked_with(&probe)),
            vec!["a.txt", "c.txt"]
        );
        assert_eq!(container.unlocked_with(&NeverLocked).len(), 3);
    }

    #[test]
    fn test_unlocked_preserves_listing_order() {
        let temp = TempDir::new().unwrap();
        write_files(
            temp.path(),
            &[("1", b""), ("2", b""), ("3", b""), ("4", b"")],
        );

        let container = EntryContainer::open(temp.path()).unwrap();
        let listed: Vec<&str> = container.entries().iter().map(Entry::name).collect();
        let unlocked: Vec<&str> = container
            .unlocked_with(&NeverLocked)
            .into_iter()
            .map(Entry::name)
            .collect();
        assert_eq!(listed, unlocked);
    }

    #[test]
    fn test_ready_combines_filters() {
        let temp = TempDir::new().unwrap();
        write_files(
            temp.path(),
            &[
                ("0645.11111111111.20220923174555.cer", b"x"),
                ("0646.11111111111.20220923174555.cer", b"x"),
                ("garbage", b"x"),
            ],
        );

        let container = EntryContainer::certificates(temp.path()).unwrap();
        let probe = FixedLocks::new([temp.path().join("0645.11111111111.20220923174555.cer")]);
        assert_eq!(
            names(&container.ready_with(&probe)),
            vec!["0646.11111111111.20220923174555.cer"]
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_unlocked_skips_file_open_for_writing() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &[("done.txt", b"done")]);
        let _writer = std::fs::File::create(temp.path().join("busy.txt")).unwrap();

        let container = EntryContainer::open(temp.path()).unwrap();
        let unlocked = container.unlocked();
        assert_eq!(names(&unlocked), vec!["done.txt"]);
    }

    #[test]
    fn test_custom_factory() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &[("keep.cer", b"x"), ("skip.tmp", b"x")]);

        let factory = |dir: &Path, name: &str| {
            let verdict = if Path::new(name).extension().is_some_and(|ext| ext == "tmp") {
                Err(ValidationError::Rejected {
                    reason: "temporary file".into(),
                })
            } else {
                Ok(String::new())
            };
            Entry::with_verdict(dir, name, verdict)
        };
        let container = EntryContainer::open_with(temp.path(), &factory).unwrap();
        assert_eq!(names(&container.valid()), vec!["keep.cer"]);
    }

    #[test]
    fn test_into_iterator() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &[("a", b""), ("b", b"")]);
        let container = EntryContainer::open(temp.path()).unwrap();
        let count = (&container).into_iter().count();
        assert_eq!(count, 2);
        assert_eq!(container.into_entries().len(), 2);
    }
}
