//! Configuration for the pinned binary cache.
//!
//! Resolves the cache root from XDG conventions with a home-directory
//! fallback, and carries the download base URL.

use camino::Utf8PathBuf;
use std::path::PathBuf;

/// Namespace segment appended to the base cache directory.
const CACHE_SUBDIR: &str = "pre-commit-hooks";

/// Public bucket the pinned `clang-format` builds are served from.
pub const DEFAULT_BASE_URL: &str = "https://commondatastorage.googleapis.com/chromium-clang-format/";

/// Configuration for the pinned binary cache.
#[derive(Debug, Clone)]
pub struct BinaryCacheConfig {
    /// Root directory holding cached binaries.
    pub cache_dir: Utf8PathBuf,
    /// URL prefix that a content hash is appended to. Always ends with `/`.
    pub base_url: String,
}

impl BinaryCacheConfig {
    /// Creates a new cache configuration using the resolved cache directory
    /// and the public download bucket.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dir(resolve_cache_dir())
    }

    /// Creates a cache configuration with a custom directory.
    #[must_use]
    pub fn with_dir(cache_dir: Utf8PathBuf) -> Self {
        Self {
            cache_dir,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Replaces the download base URL, appending a trailing `/` if missing.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    /// Returns the download URL for a content hash.
    #[must_use]
    pub fn url_for(&self, hash: &str) -> String {
        format!("{}{hash}", self.base_url)
    }
}

impl Default for BinaryCacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the cache root from environment and XDG conventions.
///
/// The resolution order is:
///
/// 1. `$XDG_CACHE_HOME/pre-commit-hooks` if `XDG_CACHE_HOME` is set and not blank
/// 2. `~/.cache/pre-commit-hooks` using the user's home directory
/// 3. `<temp dir>/pre-commit-hooks` as last resort
///
/// An explicit override (`PRECOMMIT_HOOKS_CACHE_DIR`) is applied by
/// [`crate::HookEnvCfg::cache_config`] before this function is consulted.
///
/// # Examples
///
/// ```
/// use precommit_hooks::cache::resolve_cache_dir;
///
/// let cache_dir = resolve_cache_dir();
/// assert!(cache_dir.as_str().ends_with("pre-commit-hooks"));
/// ```
#[must_use]
pub fn resolve_cache_dir() -> Utf8PathBuf {
    if let Some(dir) = resolve_from_xdg_cache() {
        return dir;
    }

    if let Some(dir) = resolve_from_home() {
        return dir;
    }

    let fallback = Utf8PathBuf::from_path_buf(std::env::temp_dir())
        .unwrap_or_else(|_| Utf8PathBuf::from("/tmp"));
    fallback.join(CACHE_SUBDIR)
}

/// Attempts to resolve the cache root from `XDG_CACHE_HOME`.
fn resolve_from_xdg_cache() -> Option<Utf8PathBuf> {
    let raw = std::env::var("XDG_CACHE_HOME").ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let path = Utf8PathBuf::from_path_buf(PathBuf::from(trimmed)).ok()?;
    Some(path.join(CACHE_SUBDIR))
}

/// Attempts to resolve the cache root from the home directory.
fn resolve_from_home() -> Option<Utf8PathBuf> {
    let home = dirs::home_dir()?;
    let path = Utf8PathBuf::from_path_buf(home).ok()?;
    Some(path.join(".cache").join(CACHE_SUBDIR))
}
