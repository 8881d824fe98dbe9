//! Detection of files still held open by other processes.
//!
//! Lock detection is platform specific, so the container only depends on the
//! [`LockProbe`] trait. [`default_probe`] picks the best probe for the
//! current platform; tests typically use [`NeverLocked`] or [`FixedLocks`].
//!
//! Every answer is a point-in-time snapshot. A file reported unlocked may be
//! opened by another process right after the check.

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

/// Reports whether a file is currently held open by some other process.
pub trait LockProbe {
    /// Returns `true` if `path` is locked.
    fn is_locked(&self, path: &Path) -> bool;
}

impl<F> LockProbe for F
where
    F: Fn(&Path) -> bool,
{
    fn is_locked(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Probe that reports every file as unlocked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverLocked;

impl LockProbe for NeverLocked {
    fn is_locked(&self, _path: &Path) -> bool {
        false
    }
}

/// Probe that reports a fixed set of paths as locked.
///
/// # Examples
///
/// ```
/// use certpack_core::lock::FixedLocks;
/// use certpack_core::lock::LockProbe;
/// use std::path::Path;
///
/// let probe = FixedLocks::new(["/inbox/busy.cer"]);
/// assert!(probe.is_locked(Path::new("/inbox/busy.cer")));
/// assert!(!probe.is_locked(Path::new("/inbox/idle.cer")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedLocks {
    locked: HashSet<PathBuf>,
}

impl FixedLocks {
    /// Creates a probe reporting exactly `paths` as locked.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            locked: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl LockProbe for FixedLocks {
    fn is_locked(&self, path: &Path) -> bool {
        self.locked.contains(path)
    }
}

/// Returns the lock probe for the current platform.
///
/// On Linux this is a fresh [`ProcFdProbe`] snapshot; elsewhere no probe is
/// available and every file is reported unlocked.
#[must_use]
pub fn default_probe() -> Box<dyn LockProbe> {
    #[cfg(target_os = "linux")]
    {
        Box::new(ProcFdProbe::snapshot())
    }
    #[cfg(not(target_os = "linux"))]
    {
        tracing::debug!("no lock probe for this platform, treating all files as unlocked");
        Box::new(NeverLocked)
    }
}

#[cfg(target_os = "linux")]
pub use procfs::ProcFdProbe;

#[cfg(target_os = "linux")]
mod procfs {
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use std::path::PathBuf;

    use super::LockProbe;

    const O_ACCMODE: u32 = 0o3;
    const O_RDONLY: u32 = 0o0;

    /// Linux probe that scans `/proc/<pid>/fd` for files open with write
    /// access.
    ///
    /// The scan happens once, when the probe is created. Processes whose
    /// descriptors cannot be read (other users, exited meanwhile) are
    /// skipped.
    #[derive(Debug, Clone, Default)]
    pub struct ProcFdProbe {
        open_for_write: HashSet<PathBuf>,
    }

    impl ProcFdProbe {
        /// Scans `/proc`.
        #[must_use]
        pub fn snapshot() -> Self {
            Self::scan(Path::new("/proc"))
        }

        /// Scans a procfs-shaped tree rooted at `root`.
        #[must_use]
        pub fn scan(root: &Path) -> Self {
            let mut open_for_write = HashSet::new();

            let processes = match fs::read_dir(root) {
                Ok(processes) => processes,
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "cannot scan process table");
                    return Self { open_for_write };
                }
            };

            for process in processes.flatten() {
                let is_pid = process
                    .file_name()
                    .to_str()
                    .is_some_and(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()));
                if !is_pid {
                    continue;
                }

                let process_dir = process.path();
                let Ok(descriptors) = fs::read_dir(process_dir.join("fd")) else {
                    continue;
                };
                for descriptor in descriptors.flatten() {
                    let Ok(target) = fs::read_link(descriptor.path()) else {
                        continue;
                    };
                    // sockets, pipes and anon inodes are not absolute paths
                    if !target.is_absolute() {
                        continue;
                    }
                    let info = process_dir.join("fdinfo").join(descriptor.file_name());
                    if opened_for_write(&info) {
                        open_for_write.insert(target);
                    }
                }
            }

            tracing::debug!(files = open_for_write.len(), "scanned open file descriptors");
            Self { open_for_write }
        }
    }

    impl LockProbe for ProcFdProbe {
        fn is_locked(&self, path: &Path) -> bool {
            let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            self.open_for_write.contains(&resolved)
        }
    }

    fn opened_for_write(fdinfo: &Path) -> bool {
        let Ok(text) = fs::read_to_string(fdinfo) else {
            return false;
        };
        text.lines()
            .find_map(|line| line.strip_prefix("flags:"))
            .and_then(|flags| u32::from_str_radix(flags.trim(), 8).ok())
            .is_some_and(|flags| flags & O_ACCMODE != O_RDONLY)
    }

}
