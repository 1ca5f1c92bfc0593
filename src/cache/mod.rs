//! Shared cache of pinned `clang-format` binaries.
//!
//! [`BinaryCache::resolve`] turns a release and platform into the path of a
//! verified executable, downloading it at most once per content hash per
//! cache root. Binaries are stored in a user-specific directory and shared by
//! every hook invocation.
//!
//! # Cache Location
//!
//! The cache root is resolved in the following order:
//!
//! 1. `PRECOMMIT_HOOKS_CACHE_DIR` if set
//! 2. `$XDG_CACHE_HOME/pre-commit-hooks` if `XDG_CACHE_HOME` is set
//! 3. `~/.cache/pre-commit-hooks` as fallback
//!
//! # Cross-Process Coordination
//!
//! Entries are published with an atomic rename of a temporary file created
//! in the cache root, so a concurrent reader never sees a partial binary.
//! A per-hash lock additionally keeps parallel invocations from downloading
//! the same binary twice.

mod config;
mod lock;
mod store;
mod verify;

pub use config::{BinaryCacheConfig, DEFAULT_BASE_URL, resolve_cache_dir};
pub use lock::DownloadLock;
pub use store::{ArtifactStore, ENTRY_PREFIX, README_NAME};
pub use verify::{sha1_file, verify_sha1};

use camino::Utf8PathBuf;
use tracing::{debug, info, info_span, warn};

use crate::download::{Downloader, HttpDownloader};
use crate::error::{CacheError, CacheResult};
use crate::pins::{ClangFormatVersion, pinned_hash};
use crate::platform::Platform;

/// Observability target for cache operations.
pub(crate) const LOG_TARGET: &str = "precommit_hooks::cache";

/// Resolves pinned releases to verified local binaries.
#[derive(Debug)]
pub struct BinaryCache<D = HttpDownloader> {
    config: BinaryCacheConfig,
    downloader: D,
}

impl BinaryCache<HttpDownloader> {
    /// Creates a cache that downloads over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Download`] if the HTTP client cannot be built.
    pub fn new(config: BinaryCacheConfig) -> CacheResult<Self> {
        Ok(Self::with_downloader(config, HttpDownloader::new()?))
    }
}

impl<D: Downloader> BinaryCache<D> {
    /// Creates a cache that fetches through `downloader`.
    #[must_use]
    pub const fn with_downloader(config: BinaryCacheConfig, downloader: D) -> Self {
        Self { config, downloader }
    }

    /// Returns the cache configuration.
    #[must_use]
    pub const fn config(&self) -> &BinaryCacheConfig {
        &self.config
    }

    /// Returns the path of a verified binary for `version` on `platform`.
    ///
    /// The pinned hash is looked up first, so an unpinned request fails
    /// without touching the filesystem or network. Otherwise the cache root
    /// is created if needed, the binary is downloaded when absent, and the
    /// file on disk is re-hashed on every call.
    ///
    /// # Errors
    ///
    /// - [`CacheError::UnpinnedRelease`] when the table has no entry.
    /// - [`CacheError::Download`] when fetching a missing binary fails.
    /// - [`CacheError::Integrity`] when the cached file does not match its
    ///   pin. The file is left in place for the operator to delete.
    /// - [`CacheError::Io`] for local filesystem failures.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use precommit_hooks::cache::{BinaryCache, BinaryCacheConfig};
    /// use precommit_hooks::{ClangFormatVersion, Platform};
    ///
    /// let cache = BinaryCache::new(BinaryCacheConfig::default())?;
    /// let binary = cache.resolve(ClangFormatVersion::new(11, 0, 0), Platform::current()?)?;
    /// println!("clang-format at {binary}");
    /// # Ok::<(), precommit_hooks::CacheError>(())
    /// ```
    pub fn resolve(
        &self,
        version: ClangFormatVersion,
        platform: Platform,
    ) -> CacheResult<Utf8PathBuf> {
        let hash = pinned_hash(version, platform)
            .ok_or(CacheError::UnpinnedRelease { version, platform })?;

        let span = info_span!(
            target: LOG_TARGET,
            "resolve_binary",
            version = %version,
            platform = %platform
        );
        let _entered = span.enter();
        self.resolve_hash(hash)
    }

    /// Returns the path of a verified binary whose sha1 is `hash`,
    /// downloading it into the cache when absent.
    ///
    /// # Errors
    ///
    /// Fails like [`Self::resolve`], minus the table lookup.
    pub fn resolve_hash(&self, hash: &str) -> CacheResult<Utf8PathBuf> {
        let store = ArtifactStore::open(self.config.cache_dir.clone())?;
        let path = if store.has(hash) {
            debug!(target: LOG_TARGET, sha1 = hash, "cache hit");
            store.path_for(hash)
        } else {
            self.fetch(&store, hash)?
        };

        if let Err(err) = verify_sha1(&path, hash) {
            warn!(target: LOG_TARGET, path = %path, "cached binary failed verification");
            return Err(err);
        }
        Ok(path)
    }

    fn fetch(&self, store: &ArtifactStore, hash: &str) -> CacheResult<Utf8PathBuf> {
        let _lock = DownloadLock::acquire(store.root(), hash)
            .map_err(|err| CacheError::io("lock", store.root(), err))?;

        // A parallel invocation may have published the entry while we waited.
        if store.has(hash) {
            debug!(target: LOG_TARGET, "entry published by another process");
            return Ok(store.path_for(hash));
        }

        let url = self.config.url_for(hash);
        info!(target: LOG_TARGET, url = %url, "Downloading clang-format (~2mb)...");
        store.put(hash, |file| {
            self.downloader.download(&url, file)?;
            Ok(())
        })
    }
}
