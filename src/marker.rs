//! Scans staged files for the `DO NOT SUBMIT` marker.
//!
//! The search is delegated to `git grep --no-index`, which is fast, present
//! wherever pre-commit runs, and behaves identically across platforms.

use std::process::{Command, Output};

use camino::Utf8PathBuf;
use tracing::debug;

use crate::error::{ToolError, ToolResult};
use crate::observability::LOG_TARGET;

/// Marker that blocks a commit.
pub const DO_NOT_SUBMIT: &str = "DO NOT SUBMIT";

/// Result of scanning a set of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No file contains the marker.
    Clean,
    /// At least one file contains the marker.
    Found {
        /// `path:line:text` lines reported by `git grep`.
        matches: String,
    },
}

impl ScanOutcome {
    /// Process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::Found { .. } => 1,
        }
    }
}

/// Builds the `git grep` command searching `files` for `marker`.
#[must_use]
pub fn grep_command(marker: &str, files: &[Utf8PathBuf]) -> Command {
    let mut command = Command::new("git");
    command
        .args(["grep", "-Hn", "--no-index", "-e", marker, "--"])
        .args(files.iter().map(|file| file.as_std_path()));
    command
}

/// Searches `files` for [`DO_NOT_SUBMIT`].
///
/// An empty file list is clean without invoking git.
///
/// # Errors
///
/// Returns [`ToolError::Spawn`] if git cannot be started, or
/// [`ToolError::GitGrep`] if it exits with anything other than a match (0) or
/// no match (1).
pub fn scan(files: &[Utf8PathBuf]) -> ToolResult<ScanOutcome> {
    if files.is_empty() {
        return Ok(ScanOutcome::Clean);
    }

    let output = grep_command(DO_NOT_SUBMIT, files)
        .output()
        .map_err(|source| ToolError::Spawn {
            program: "git".to_owned(),
            source,
        })?;
    debug!(target: LOG_TARGET, status = %output.status, files = files.len(), "git grep finished");
    classify(&output)
}

/// Maps a finished `git grep` to a scan outcome.
///
/// # Errors
///
/// Returns [`ToolError::GitGrep`] for exit statuses other than 0 and 1.
pub fn classify(output: &Output) -> ToolResult<ScanOutcome> {
    match output.status.code() {
        Some(0) => Ok(ScanOutcome::Found {
            matches: String::from_utf8_lossy(&output.stdout).into_owned(),
        }),
        Some(1) => Ok(ScanOutcome::Clean),
        _ => Err(ToolError::GitGrep {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    fn output(code: i32, stdout: &str, stderr: &str) -> Output {
        Output {
            status: ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn exit_zero_reports_matches() {
        let outcome = classify(&output(0, "a.cc:3:// DO NOT SUBMIT\n", "")).expect("classify");
        assert_eq!(
            outcome,
            ScanOutcome::Found {
                matches: "a.cc:3:// DO NOT SUBMIT\n".to_owned()
            }
        );
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn exit_one_is_clean() {
        let outcome = classify(&output(1, "", "")).expect("classify");
        assert_eq!(outcome, ScanOutcome::Clean);
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn other_exits_are_tool_errors() {
        let err = classify(&output(128, "", "fatal: bad path\n")).expect_err("git failure");
        assert!(matches!(err, ToolError::GitGrep { ref stderr, .. } if stderr.contains("bad path")));
    }

    #[test]
    fn empty_file_list_skips_git() {
        assert_eq!(scan(&[]).expect("scan"), ScanOutcome::Clean);
    }

    #[test]
    fn grep_command_passes_marker_as_pattern() {
        let files = vec![Utf8PathBuf::from("-weird.txt")];
        let command = grep_command(DO_NOT_SUBMIT, &files);
        let args: Vec<_> = command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            ["grep", "-Hn", "--no-index", "-e", "DO NOT SUBMIT", "--", "-weird.txt"]
        );
    }
}
