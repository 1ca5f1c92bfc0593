//! Content-addressed storage of downloaded binaries.
//!
//! [`ArtifactStore`] treats the cache root as a key-value store where the key
//! is a content hash and the value is an executable file. Entries are staged
//! in a temporary file beside their final location and published with a
//! single rename, so readers observe either no entry or a complete one.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

use super::LOG_TARGET;
use crate::error::{CacheError, CacheResult};

/// Prefix of every published entry's file name.
pub const ENTRY_PREFIX: &str = "clang-format-";

/// Name of the provenance note written into a fresh cache root.
pub const README_NAME: &str = "README";

const README_CONTENTS: &str = "\
This directory is maintained by the pre-commit-hooks helpers.
Each clang-format-<sha1> file is a formatter binary named after its sha1.
Files are never modified once written; delete any of them to force a fresh download.
";

/// Handle on a cache root directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: Utf8PathBuf,
}

impl ArtifactStore {
    /// Wraps `root` without touching the filesystem.
    #[must_use]
    pub const fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    /// Opens the store, creating the root and its README on first use.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the directory or README cannot be created.
    pub fn open(root: Utf8PathBuf) -> CacheResult<Self> {
        let store = Self::new(root);
        store.ensure_root()?;
        Ok(store)
    }

    /// Returns the cache root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the path an entry for `key` is published at.
    #[must_use]
    pub fn path_for(&self, key: &str) -> Utf8PathBuf {
        self.root.join(format!("{ENTRY_PREFIX}{key}"))
    }

    /// Reports whether an entry for `key` has been published.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    /// Publishes an entry for `key` from bytes produced by `fill`.
    ///
    /// `fill` writes into a temporary file created in the cache root. Once it
    /// succeeds the file is flushed, marked executable and renamed onto
    /// [`Self::path_for`]. When `fill` or any later step fails the temporary
    /// file is removed and nothing is published. A concurrent publisher of the
    /// same key is harmless: the last rename wins.
    ///
    /// # Errors
    ///
    /// Propagates the error from `fill`, or returns [`CacheError::Io`] if
    /// staging or renaming the file fails.
    pub fn put<F>(&self, key: &str, fill: F) -> CacheResult<Utf8PathBuf>
    where
        F: FnOnce(&mut File) -> CacheResult<()>,
    {
        let dest = self.path_for(key);
        let mut staged = self.stage(key)?;

        fill(staged.as_file_mut())?;

        let file = staged.as_file_mut();
        file.flush()
            .and_then(|()| file.sync_all())
            .map_err(|err| CacheError::io("flush staged download", dest.as_path(), err))?;
        make_executable(file)
            .map_err(|err| CacheError::io("mark executable", dest.as_path(), err))?;

        info!(target: LOG_TARGET, path = %dest, "moving downloaded clang-format into place");
        staged.persist(&dest).map_err(|err| {
            CacheError::io("rename staged download onto", dest.as_path(), err.error)
        })?;
        Ok(dest)
    }

    fn stage(&self, key: &str) -> CacheResult<NamedTempFile> {
        Builder::new()
            .prefix(&format!(".{ENTRY_PREFIX}{key}."))
            .suffix(".partial")
            .tempfile_in(&self.root)
            .map_err(|err| CacheError::io("create staging file in", self.root.as_path(), err))
    }

    fn ensure_root(&self) -> CacheResult<()> {
        if self.root.is_dir() {
            return Ok(());
        }

        fs::create_dir_all(&self.root)
            .map_err(|err| CacheError::io("create cache directory", self.root.as_path(), err))?;
        debug!(target: LOG_TARGET, path = %self.root, "created cache directory");

        let readme = self.root.join(README_NAME);
        match fs::OpenOptions::new().write(true).create_new(true).open(&readme) {
            Ok(mut file) => file
                .write_all(README_CONTENTS.as_bytes())
                .map_err(|err| CacheError::io("write", readme, err)),
            // Another process created the root first.
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(CacheError::io("create", readme, err)),
        }
    }
}

#[cfg(unix)]
fn make_executable(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = file.metadata()?.permissions();
    permissions.set_mode(permissions.mode() | 0o100);
    file.set_permissions(permissions)
}

#[cfg(not(unix))]
#[expect(
    clippy::unnecessary_wraps,
    reason = "signature matches the unix variant"
)]
const fn make_executable(_file: &File) -> std::io::Result<()> {
    Ok(())
}
