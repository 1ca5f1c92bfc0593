//! Domain error types for the pre-commit helpers.

use camino::Utf8PathBuf;
use color_eyre::Report;
use thiserror::Error;

use crate::pins::ClangFormatVersion;
use crate::platform::Platform;

/// Result alias for operations that may return a [`HookError`].
pub type Result<T> = std::result::Result<T, HookError>;

/// Result alias for binary cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Result alias for delegated tool invocations.
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Result alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Top-level error exposed by the crate.
#[derive(Debug, Error)]
pub enum HookError {
    /// Resolving or fetching the pinned binary failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
    /// Running an external tool failed.
    #[error(transparent)]
    Tool(#[from] ToolError),
    /// Loading configuration failed.
    #[error("configuration loading failed")]
    Config(#[from] ConfigError),
}

/// Failures raised while turning a pinned release into a verified local binary.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The running operating system has no pinned binaries.
    #[error("unsupported platform '{0}'; pinned binaries exist for Linux, Darwin and Windows")]
    UnsupportedPlatform(String),
    /// No hash is pinned for the requested release on this platform.
    #[error("no clang-format binary is pinned for version {version} on {platform}")]
    UnpinnedRelease {
        /// Requested release.
        version: ClangFormatVersion,
        /// Platform the release was requested for.
        platform: Platform,
    },
    /// Fetching the binary over HTTP failed.
    #[error(transparent)]
    Download(#[from] DownloadError),
    /// The cached file does not hash to the pinned value.
    #[error(
        "sha1 mismatch on {path}: expected {expected}, but was {actual}. \
         Maybe the file is corrupted? Try deleting it."
    )]
    Integrity {
        /// Cache entry that failed verification.
        path: Utf8PathBuf,
        /// Pinned sha1.
        expected: String,
        /// Sha1 of the bytes on disk.
        actual: String,
    },
    /// A local filesystem operation on the cache failed.
    #[error("failed to {action} {path}")]
    Io {
        /// Short description of the attempted operation.
        action: &'static str,
        /// Path the operation targeted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    pub(crate) fn io(
        action: &'static str,
        path: impl Into<Utf8PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Captures HTTP download failures with their context.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct DownloadError(#[from] Report);

/// Failures raised by delegated command-line tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The program could not be started.
    #[error("failed to launch {program}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// `git grep` reported an invocation error rather than a search result.
    #[error("git grep failed with {status}:\n{stderr}")]
    GitGrep {
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },
}

/// Captures configuration failures.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ConfigError(#[from] Report);
