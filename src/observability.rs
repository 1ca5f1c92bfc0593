//! Shared tracing configuration for the hook binaries.
//!
//! Hook output is read by people scanning a failed commit, so events go to
//! stderr without timestamps or targets.

use std::str::FromStr;

use color_eyre::eyre::eyre;
use tracing::Level;

use crate::error::{ConfigError, ConfigResult};

/// Target used by tool invocation spans and logs.
pub(crate) const LOG_TARGET: &str = "precommit_hooks::tool";

/// Level used when none is configured.
pub const DEFAULT_LEVEL: Level = Level::INFO;

/// Parses a level name such as `debug` or `WARN`, falling back to
/// [`DEFAULT_LEVEL`] when `raw` is `None`.
///
/// # Errors
///
/// Returns a [`ConfigError`] for unknown level names.
pub fn parse_level(raw: Option<&str>) -> ConfigResult<Level> {
    raw.map_or(Ok(DEFAULT_LEVEL), |name| {
        Level::from_str(name.trim())
            .map_err(|err| ConfigError::from(eyre!("invalid log level '{name}': {err}")))
    })
}

/// Installs the global stderr subscriber.
///
/// Installing twice is harmless; the first subscriber stays active.
pub fn init_tracing(level: Level) {
    drop(
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(level)
            .with_target(false)
            .without_time()
            .try_init(),
    );
}
