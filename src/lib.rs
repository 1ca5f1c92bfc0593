//! Pre-commit helpers for C and C++ repositories.
//!
//! Two hooks are built on this library:
//!
//! - `check-do-not-submit` fails a commit when a staged file contains the
//!   `DO NOT SUBMIT` marker (see [`marker`]).
//! - `clang-format-hook` formats changed files with a `clang-format` release
//!   pinned by content hash, downloading and verifying the binary on first use
//!   (see [`cache`] and [`format`]).

pub mod cache;
pub mod download;
mod error;
pub mod format;
pub mod marker;
pub mod observability;
pub mod pins;
pub mod platform;

pub use cache::{BinaryCache, BinaryCacheConfig};
pub use error::{
    CacheError, CacheResult, ConfigError, ConfigResult, DownloadError, HookError, Result,
    ToolError, ToolResult,
};
pub use format::FormatScope;
pub use pins::{ClangFormatVersion, PINNED_RELEASES};
pub use platform::Platform;

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::eyre;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use tracing::Level;

use crate::format::{FormatRequest, locate_git_clang_format};

/// Hook settings supplied via `PRECOMMIT_HOOKS_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, OrthoConfig, Default)]
#[ortho_config(prefix = "PRECOMMIT_HOOKS")]
///
/// # Examples
/// ```
/// use precommit_hooks::HookEnvCfg;
///
/// let cfg = HookEnvCfg::default();
/// assert!(cfg.cache_dir.is_none());
/// ```
pub struct HookEnvCfg {
    /// Cache root overriding the XDG-derived default.
    pub cache_dir: Option<Utf8PathBuf>,
    /// Bucket URL the pinned hashes are appended to.
    pub download_base_url: Option<String>,
    /// Explicit `git-clang-format` driver.
    pub git_clang_format: Option<Utf8PathBuf>,
    /// Tracing level for hook output, `info` when unset.
    pub log_level: Option<String>,
}

impl HookEnvCfg {
    /// Loads configuration from environment variables without parsing CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a variable cannot be parsed.
    pub fn load() -> ConfigResult<Self> {
        let args = [OsString::from("pre-commit-hooks")];
        Self::load_from_iter(args).map_err(|err| ConfigError::from(eyre!(err)))
    }

    /// Builds the cache configuration, applying any overrides.
    ///
    /// Blank overrides are treated as unset.
    #[must_use]
    pub fn cache_config(&self) -> BinaryCacheConfig {
        let config = match self.cache_dir.as_ref().map(|dir| dir.as_str().trim()) {
            Some(dir) if !dir.is_empty() => BinaryCacheConfig::with_dir(Utf8PathBuf::from(dir)),
            _ => BinaryCacheConfig::new(),
        };
        match self.download_base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
            _ => config,
        }
    }

    /// Returns the configured tracing level.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unknown level names.
    pub fn level(&self) -> ConfigResult<Level> {
        observability::parse_level(self.log_level.as_deref())
    }

    /// Returns the explicit `git-clang-format` path, if any.
    #[must_use]
    pub fn git_clang_format(&self) -> Option<&Utf8Path> {
        self.git_clang_format.as_deref()
    }
}

/// Resolves the pinned `clang-format` for this platform and formats `files`.
///
/// Returns the formatter's exit code so the hook can propagate it verbatim.
///
/// # Errors
///
/// Returns a [`HookError`] if the platform is unsupported, the binary cannot
/// be fetched or verified, or the formatter cannot be launched.
pub fn run_clang_format(
    cfg: &HookEnvCfg,
    version: ClangFormatVersion,
    scope: FormatScope,
    files: &[Utf8PathBuf],
) -> Result<i32> {
    let platform = Platform::current()?;
    let cache = BinaryCache::new(cfg.cache_config())?;
    let binary = cache.resolve(version, platform)?;
    let git_clang_format = locate_git_clang_format(cfg.git_clang_format());

    let request = FormatRequest {
        scope,
        binary: &binary,
        git_clang_format: &git_clang_format,
        files,
    };
    Ok(request.run()?)
}
