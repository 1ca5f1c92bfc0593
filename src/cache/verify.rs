//! Sha1 verification of cache entries.

use camino::Utf8Path;
use sha1::{Digest, Sha1};
use std::fs;
use std::io;
use tracing::debug;

use super::LOG_TARGET;
use crate::error::{CacheError, CacheResult};

/// Computes the lowercase hex sha1 of a file by streaming it through the
/// hasher.
///
/// # Errors
///
/// Returns [`CacheError::Io`] if the file cannot be opened or read.
pub fn sha1_file(path: &Utf8Path) -> CacheResult<String> {
    let mut file = fs::File::open(path).map_err(|err| CacheError::io("open", path, err))?;
    let mut hasher = Sha1::new();
    io::copy(&mut file, &mut hasher).map_err(|err| CacheError::io("read", path, err))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Confirms that `path` hashes to `expected`.
///
/// # Errors
///
/// Returns [`CacheError::Integrity`] on mismatch, leaving the file untouched,
/// or [`CacheError::Io`] if it cannot be read.
pub fn verify_sha1(path: &Utf8Path, expected: &str) -> CacheResult<()> {
    let actual = sha1_file(path)?;
    if actual == expected {
        debug!(target: LOG_TARGET, path = %path, sha1 = %actual, "cache entry verified");
        Ok(())
    } else {
        Err(CacheError::Integrity {
            path: path.to_path_buf(),
            expected: expected.to_owned(),
            actual,
        })
    }
}
