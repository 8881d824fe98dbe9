//! Staged writes and rollback for extraction.

use std::fs;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use tempfile::Builder;

/// Files written by one extraction call.
///
/// Unless [`ExtractedFiles::commit`] is called, every recorded file is
/// removed again, either by [`ExtractedFiles::rollback`] or on drop.
#[derive(Debug, Default)]
pub(crate) struct ExtractedFiles {
    paths: Vec<PathBuf>,
}

impl ExtractedFiles {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// Keeps every recorded file.
    pub(crate) fn commit(mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths)
    }

    /// Removes every recorded file now.
    pub(crate) fn rollback(mut self) {
        self.remove_all();
    }

    fn remove_all(&mut self) {
        for path in self.paths.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => tracing::debug!(file = %path.display(), "removed extracted file"),
                Err(e) => tracing::warn!(
                    file = %path.display(),
                    error = %e,
                    "failed to remove extracted file during rollback"
                ),
            }
        }
    }
}

impl Drop for ExtractedFiles {
    fn drop(&mut self) {
        self.remove_all();
    }
}

/// Mode of extracted files whose member carries no Unix permissions.
#[cfg(unix)]
const DEFAULT_MODE: u32 = 0o644;

/// Permission bits for an extracted file: the member's own bits, always
/// readable and writable by the owner. The process umask still applies.
#[cfg(unix)]
fn file_mode(member_mode: Option<u32>) -> u32 {
    member_mode.map_or(DEFAULT_MODE, |mode| (mode & 0o777) | 0o600)
}

/// Copies `reader` into `destination/name` through a temporary file in
/// `destination`.
///
/// The target appears only once its content is complete, and an existing
/// file of the same name is never replaced. On Unix the file is created with
/// the member's mode bits instead of the private mode of temporary files.
///
/// # Errors
///
/// Returns the I/O error of the copy, or [`io::ErrorKind::AlreadyExists`] if
/// the target already exists. The temporary file is removed in both cases.
pub(crate) fn stage_file<R: Read + ?Sized>(
    reader: &mut R,
    destination: &Path,
    name: &str,
    mode: Option<u32>,
) -> io::Result<(PathBuf, u64)> {
    let mut builder = Builder::new();
    builder.prefix(".certpack-").suffix(".part");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(file_mode(mode)));
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut staged = builder.tempfile_in(destination)?;
    let bytes = io::copy(reader, staged.as_file_mut())?;

    let target = destination.join(name);
    staged.persist_noclobber(&target).map_err(|e| e.error)?;
    Ok((target, bytes))
}
