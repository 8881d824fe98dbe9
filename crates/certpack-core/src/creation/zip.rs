//! ZIP writing primitives.
//!
//! Low-level helpers used by [`ArchiveBuilder`](super::ArchiveBuilder). They
//! report failures but never clean up; rollback is the builder's job.

use std::fs::File;
use std::io;
use std::io::Seek;
use std::io::Write;
use std::path::Path;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::ArchiveError;
use crate::Result;
use crate::entry::Entry;

/// File options for DEFLATE compression at `level` (1-9).
#[must_use]
pub fn deflate_options(level: u8) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i64::from(level)))
}

/// Copies the content of `entry` into `zip` under its bare name.
///
/// Returns the number of uncompressed bytes written.
///
/// # Errors
///
/// - [`ArchiveError::SourceMissing`] if the source file does not exist
/// - [`ArchiveError::PermissionDenied`] if the source file cannot be read
/// - [`ArchiveError::ArchiveWrite`] for any other read or write failure
pub fn append_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    entry: &Entry,
    options: SimpleFileOptions,
    archive_path: &Path,
) -> Result<u64> {
    let source_path = entry.full_path();
    let mut source = File::open(&source_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ArchiveError::SourceMissing {
            name: entry.name().to_string(),
            directory: entry.directory().to_path_buf(),
            source: e,
        },
        io::ErrorKind::PermissionDenied => ArchiveError::PermissionDenied {
            path: source_path.clone(),
            source: e,
        },
        _ => write_failed(archive_path, e),
    })?;

    zip.start_file(entry.name(), options)
        .map_err(|e| write_failed(archive_path, io::Error::other(e)))?;

    io::copy(&mut source, zip).map_err(|e| write_failed(archive_path, e))
}

/// Finishes the central directory and returns the underlying writer.
///
/// # Errors
///
/// Returns [`ArchiveError::ArchiveWrite`] if the trailer cannot be written.
pub fn finish<W: Write + Seek>(zip: ZipWriter<W>, archive_path: &Path) -> Result<W> {
    zip.finish()
        .map_err(|e| write_failed(archive_path, io::Error::other(e)))
}

fn write_failed(archive_path: &Path, source: io::Error) -> ArchiveError {
    ArchiveError::ArchiveWrite {
        path: archive_path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::write_files;
    use std::io::Cursor;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_append_entry_uses_bare_name() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &[("a.txt", "hello world")]);
        let entry = Entry::new(temp.path(), "a.txt");

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let written = append_entry(&mut zip, &entry, deflate_options(6), Path::new("t.zip")).unwrap();
        assert_eq!(written, 11);
        let data = finish(zip, Path::new("t.zip")).unwrap().into_inner();

        let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 1);
        let mut file = archive.by_index(0).unwrap();
        assert_eq!(file.name(), "a.txt");
        assert_eq!(file.compression(), CompressionMethod::Deflated);
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        assert_eq!(content, "hello world");
    }

    #[test]
    fn test_append_missing_entry() {
        let temp = TempDir::new().unwrap();
        let entry = Entry::new(temp.path(), "gone.txt");

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let err = append_entry(&mut zip, &entry, deflate_options(6), Path::new("t.zip")).unwrap_err();
        match err {
            ArchiveError::SourceMissing { name, directory, .. } => {
                assert_eq!(name, "gone.txt");
                assert_eq!(directory, temp.path());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_name_is_write_error() {
        let temp = TempDir::new().unwrap();
        write_files(temp.path(), &[("a.txt", "x")]);
        let entry = Entry::new(temp.path(), "a.txt");

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        append_entry(&mut zip, &entry, deflate_options(6), Path::new("t.zip")).unwrap();
        let err = append_entry(&mut zip, &entry, deflate_options(6), Path::new("t.zip")).unwrap_err();
        assert!(matches!(err, ArchiveError::ArchiveWrite { .. }));
    }
}
