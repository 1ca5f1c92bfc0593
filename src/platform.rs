//! Identifies the operating system the pinned binaries are selected for.

use std::fmt;
use std::str::FromStr;

use crate::error::CacheError;

/// Operating systems with pinned `clang-format` builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux on x86-64.
    Linux,
    /// macOS.
    Darwin,
    /// Windows.
    Windows,
}

impl Platform {
    /// Every platform with pinned binaries.
    pub const ALL: [Self; 3] = [Self::Linux, Self::Darwin, Self::Windows];

    /// Detects the platform of the running process.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::UnsupportedPlatform`] when the operating system has
    /// no pinned binaries.
    pub fn current() -> Result<Self, CacheError> {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps a Rust target OS name (as in [`std::env::consts::OS`]) to a platform.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::UnsupportedPlatform`] for unknown names.
    pub fn from_os(os: &str) -> Result<Self, CacheError> {
        match os {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::Darwin),
            "windows" => Ok(Self::Windows),
            other => Err(CacheError::UnsupportedPlatform(other.to_owned())),
        }
    }

    /// Returns the platform name used by the pinned table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Darwin => "Darwin",
            Self::Windows => "Windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == s)
            .ok_or_else(|| CacheError::UnsupportedPlatform(s.to_owned()))
    }
}
