//! Cross-process download locking.
//!
//! Parallel hook invocations frequently miss the same cache entry at once.
//! An exclusive per-hash `flock(2)` lets one of them download while the
//! others wait and then find the finished file. Correctness never depends on
//! the lock: entries still land through an atomic rename. On non-Unix
//! platforms locking is a no-op.

use camino::Utf8Path;
use std::fs::{File, OpenOptions};
use std::io;

#[cfg(unix)]
use std::os::unix::io::AsRawFd;

/// Subdirectory within the cache for lock files.
pub(crate) const LOCKS_SUBDIR: &str = ".locks";

/// Guard that holds a download lock until dropped.
#[derive(Debug)]
pub struct DownloadLock {
    _file: File,
}

impl DownloadLock {
    /// Blocks until the exclusive lock for `hash` is held.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock file cannot be created or the lock cannot
    /// be acquired.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use camino::Utf8Path;
    /// use precommit_hooks::cache::DownloadLock;
    ///
    /// let cache_dir = Utf8Path::new("/tmp/pre-commit-hooks");
    /// let _lock = DownloadLock::acquire(cache_dir, "1baf0089e895c989a311b6a38ed94d0e8be4c0a7")?;
    /// # Ok::<(), std::io::Error>(())
    /// ```
    #[cfg(unix)]
    pub fn acquire(cache_dir: &Utf8Path, hash: &str) -> io::Result<Self> {
        let file = open_lock_file(cache_dir, hash)?;

        // SAFETY: `file` owns a valid descriptor for the whole call and is
        // neither moved nor closed until `flock` returns.
        let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self { _file: file })
    }

    /// Creates the lock file without locking it on non-Unix platforms.
    #[cfg(not(unix))]
    pub fn acquire(cache_dir: &Utf8Path, hash: &str) -> io::Result<Self> {
        let file = open_lock_file(cache_dir, hash)?;
        Ok(Self { _file: file })
    }
}

fn open_lock_file(cache_dir: &Utf8Path, hash: &str) -> io::Result<File> {
    let locks_dir = cache_dir.join(LOCKS_SUBDIR);
    std::fs::create_dir_all(&locks_dir)?;

    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(locks_dir.join(format!("{hash}.lock")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn acquire_creates_lock_file() {
        let temp = tempdir().expect("tempdir");
        let cache_dir = Utf8Path::from_path(temp.path()).expect("utf8 path");
        let _lock = DownloadLock::acquire(cache_dir, "abc123").expect("acquire lock");

        let lock_path = temp.path().join(LOCKS_SUBDIR).join("abc123.lock");
        assert!(lock_path.exists(), "lock file should be created");
    }

    #[test]
    fn different_hashes_have_separate_locks() {
        let temp = tempdir().expect("tempdir");
        let cache_dir = Utf8Path::from_path(temp.path()).expect("utf8 path");

        let lock1 = DownloadLock::acquire(cache_dir, "aaaa").expect("acquire lock 1");
        let lock2 = DownloadLock::acquire(cache_dir, "bbbb").expect("acquire lock 2");

        drop(lock1);
        drop(lock2);
    }

    #[test]
    fn lock_can_be_reacquired_after_release() {
        let temp = tempdir().expect("tempdir");
        let cache_dir = Utf8Path::from_path(temp.path()).expect("utf8 path");

        drop(DownloadLock::acquire(cache_dir, "aaaa").expect("first acquire"));
        drop(DownloadLock::acquire(cache_dir, "aaaa").expect("second acquire"));
    }
}
