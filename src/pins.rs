//! Compiled-in table of `clang-format` releases and their content-hash pins.
//!
//! The hashes are sha1 digests of the binaries published under
//! [`crate::cache::DEFAULT_BASE_URL`]. Each one was matched to a release by
//! running the downloaded binary on the named platform, so the table is the
//! single source of truth for both the cache key and the integrity check.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

use crate::platform::Platform;

/// A `major.minor.patch` `clang-format` release identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClangFormatVersion {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl ClangFormatVersion {
    /// Builds a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for ClangFormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Raised when a version string is not three dot-separated integers.
#[derive(Debug, Error)]
pub enum VersionParseError {
    /// The string did not contain exactly three components.
    #[error("expected a version of the form MAJOR.MINOR.PATCH, got '{0}'")]
    Shape(String),
    /// A component was not a non-negative integer.
    #[error("invalid version component in '{input}'")]
    Component {
        /// Original input.
        input: String,
        /// Integer parse failure.
        #[source]
        source: ParseIntError,
    },
}

impl FromStr for ClangFormatVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(VersionParseError::Shape(s.to_owned()));
        };
        let component = |raw: &str| {
            raw.parse::<u32>()
                .map_err(|source| VersionParseError::Component {
                    input: s.to_owned(),
                    source,
                })
        };
        Ok(Self::new(component(major)?, component(minor)?, component(patch)?))
    }
}

/// Sha1 pins of one release for every supported platform.
#[derive(Debug, Clone, Copy)]
pub struct PinnedRelease {
    /// Release the pins belong to.
    pub version: ClangFormatVersion,
    /// Pin for the Linux build.
    pub linux: &'static str,
    /// Pin for the macOS build.
    pub darwin: &'static str,
    /// Pin for the Windows build.
    pub windows: &'static str,
}

impl PinnedRelease {
    /// Returns the pin for `platform`.
    #[must_use]
    pub const fn hash_for(&self, platform: Platform) -> &'static str {
        match platform {
            Platform::Linux => self.linux,
            Platform::Darwin => self.darwin,
            Platform::Windows => self.windows,
        }
    }
}

/// Every release the formatter wrapper accepts.
pub const PINNED_RELEASES: &[PinnedRelease] = &[
    PinnedRelease {
        version: ClangFormatVersion::new(3, 5, 0),
        linux: "b26f74f07f51a99d79d34be57a28bc82dee42854",
        darwin: "ce0718a133a059aca5da5f307a36bbc310df3e12",
        windows: "fc8a7cd2219eaa70daa01173844fad4c815394d7",
    },
    PinnedRelease {
        version: ClangFormatVersion::new(3, 6, 0),
        linux: "f237f50fab9ceca4066788b7bf936ef2aa366239",
        darwin: "eb3fd19492128421c3eab80f4cdeed7b07428988",
        windows: "e93c345e8d4d003632cabae8ff4f64c3b74f0c16",
    },
    PinnedRelease {
        version: ClangFormatVersion::new(3, 7, 0),
        linux: "acc9e19e04ad4cf6be067366d2522348cd160ae1",
        darwin: "e66adcd1631b8d80650e7b15106033b04c9c2212",
        windows: "2d5e931765ee1c7c4465fd6d77c8b7606c487b3f",
    },
    PinnedRelease {
        version: ClangFormatVersion::new(3, 9, 0),
        linux: "8b68e8093516183b8f38626740eeaff97f112f7e",
        darwin: "afe0942b94fe33619361efe1510ae081c3070dc1",
        windows: "f80b6ab38d7c7e0903c25e968028c1eaa25bb874",
    },
    PinnedRelease {
        version: ClangFormatVersion::new(4, 0, 0),
        linux: "06b8b3e315c1b55b58459d61fe3297e0988c6c63",
        darwin: "e0cfdaf63938e06d05a986a0038658ec6b7cad17",
        windows: "a15d5130e787633a119e8e0ae9b267696c4c2863",
    },
    PinnedRelease {
        version: ClangFormatVersion::new(5, 0, 0),
        linux: "5349d1954e17f6ccafb6e6663b0f13cdb2bb33c8",
        darwin: "0679b295e2ce2fce7919d1e8d003e497475f24a3",
        windows: "c8455d43d052eb79f65d046c6b02c169857b963b",
    },
    PinnedRelease {
        version: ClangFormatVersion::new(8, 0, 0),
        linux: "327721c99d40602c1829b4b682771d52e1d5f1b8",
        darwin: "025ca7c75f37ef4a40f3a67d81ddd11d7d0cdb9b",
        windows: "b5f5d8d5f8a8fcd2edb5b6cae37c0dc3e129c945",
    },
    PinnedRelease {
        version: ClangFormatVersion::new(11, 0, 0),
        linux: "1baf0089e895c989a311b6a38ed94d0e8be4c0a7",
        darwin: "62bde1baa7196ad9df969fc1f06b66360b1a927b",
        windows: "d4afd4eba27022f5f6d518133aebde57281677c9",
    },
];

/// Looks up the sha1 pinned for `version` on `platform`.
#[must_use]
pub fn pinned_hash(version: ClangFormatVersion, platform: Platform) -> Option<&'static str> {
    PINNED_RELEASES
        .iter()
        .find(|release| release.version == version)
        .map(|release| release.hash_for(platform))
}

/// Lists the pinned releases in table order.
pub fn available_versions() -> impl Iterator<Item = ClangFormatVersion> {
    PINNED_RELEASES.iter().map(|release| release.version)
}
