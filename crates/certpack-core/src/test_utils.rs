//! Test utilities for directory fixtures and zip archives.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::io::Cursor;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Writes each `(name, content)` pair as a file inside `dir`.
///
/// # Examples
///
/// ```
/// use certpack_core::test_utils::write_files;
///
/// let temp = tempfile::TempDir::new().unwrap();
/// write_files(temp.path(), &[("a.txt", "alpha"), ("b.txt", "beta")]);
/// assert!(temp.path().join("b.txt").exists());
/// ```
pub fn write_files<C: AsRef<[u8]>>(dir: &Path, files: &[(&str, C)]) {
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

/// Creates an in-memory ZIP archive from a list of `(name, content)` entries.
///
/// Members are stored uncompressed, so their content appears verbatim in the
/// returned bytes (see [`corrupt_content`]).
#[must_use]
pub fn create_test_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = ZipTestBuilder::new();
    for (name, content) in entries {
        builder = builder.add_file(name, content.as_bytes());
    }
    builder.build()
}

/// Writes [`create_test_zip`] output to `path`.
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    fs::write(path, create_test_zip(entries)).unwrap();
}

/// Flips the first byte of the first occurrence of `content` in `data`.
///
/// Applied to a stored member this keeps the archive parseable but makes the
/// member fail its CRC check when read.
#[must_use]
pub fn corrupt_content(mut data: Vec<u8>, content: &str) -> Vec<u8> {
    let needle = content.as_bytes();
    let offset = data
        .windows(needle.len())
        .position(|window| window == needle)
        .unwrap();
    data[offset] ^= 0xFF;
    data
}

/// Reads every member of the archive at `path` as `(name, content)`, in
/// archive order.
#[must_use]
pub fn read_zip(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|index| {
            let mut member = archive.by_index(index).unwrap();
            let mut content = Vec::new();
            member.read_to_end(&mut content).unwrap();
            (member.name().to_string(), content)
        })
        .collect()
}

/// Builder for ZIP test archives, including entries the library rejects.
///
/// # Examples
///
/// ```
/// use certpack_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_file("file.txt", b"content")
///     .add_directory("dir/")
///     .build();
/// ```
pub struct ZipTestBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored file entry.
    #[must_use]
    pub fn add_file(mut self, name: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .unix_permissions(0o644);
        self.writer.start_file(name, options).unwrap();
        self.writer.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry.
    #[must_use]
    pub fn add_directory(mut self, name: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.writer.add_directory(name, options).unwrap();
        self
    }

    /// Builds the archive and returns its bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_test_zip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("t.zip");
        write_zip(&path, &[("a.txt", "alpha"), ("b.txt", "beta")]);

        assert_eq!(
            read_zip(&path),
            vec![
                ("a.txt".to_string(), b"alpha".to_vec()),
                ("b.txt".to_string(), b"beta".to_vec()),
            ]
        );
    }

    #[test]
    fn test_corrupt_content_breaks_only_that_member() {
        let data = corrupt_content(
            create_test_zip(&[("a.txt", "intact content"), ("b.txt", "broken content")]),
            "broken content",
        );
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();

        let mut content = String::new();
        archive
            .by_index(0)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "intact content");

        let mut content = Vec::new();
        let result = archive.by_index(1).unwrap().read_to_end(&mut content);
        assert!(result.is_err());
    }

    #[test]
    fn test_zip_builder_directory() {
        let data = ZipTestBuilder::new().add_directory("dir/").build();
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        assert!(archive.by_index(0).unwrap().is_dir());
    }
}
