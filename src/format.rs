//! Runs the resolved `clang-format` binary against changed files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use tracing::{debug, info};

use crate::error::{ToolError, ToolResult};
use crate::observability::LOG_TARGET;

/// Name of the driver script that formats only changed lines.
pub const GIT_CLANG_FORMAT: &str = "git-clang-format";

/// How much of each file the formatter may rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatScope {
    /// Only lines touched by the pending change, via `git-clang-format`.
    Diff,
    /// Entire files, by running the binary with `-i`.
    WholeFile,
}

/// A fully resolved formatter invocation.
#[derive(Debug, Clone)]
pub struct FormatRequest<'a> {
    /// Scope selected on the command line.
    pub scope: FormatScope,
    /// Verified `clang-format` binary.
    pub binary: &'a Utf8Path,
    /// `git-clang-format` driver used in [`FormatScope::Diff`] mode.
    pub git_clang_format: &'a Path,
    /// Files pre-commit reports as changed.
    pub files: &'a [Utf8PathBuf],
}

impl FormatRequest<'_> {
    /// Builds the command for this request without running it.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut command = match self.scope {
            FormatScope::Diff => {
                let mut command = Command::new(self.git_clang_format);
                command.arg("-f").arg("--binary").arg(self.binary.as_std_path());
                command
            }
            FormatScope::WholeFile => {
                let mut command = Command::new(self.binary.as_std_path());
                command.arg("-i");
                command
            }
        };
        command.arg("--");
        command.args(self.files.iter().map(|file| file.as_std_path()));
        command
    }

    /// Runs the formatter with inherited stdio and returns its exit code.
    ///
    /// A formatter killed by a signal reports `1`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Spawn`] if the program cannot be started.
    pub fn run(&self) -> ToolResult<i32> {
        let joined = self
            .files
            .iter()
            .map(|file| file.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let extent = match self.scope {
            FormatScope::Diff => "changed",
            FormatScope::WholeFile => "all",
        };
        info!(target: LOG_TARGET, "Formatting {extent} lines in {joined}");

        let mut command = self.command();
        debug!(target: LOG_TARGET, command = %describe(&command), "launching formatter");
        let status = command.status().map_err(|source| ToolError::Spawn {
            program: command.get_program().to_string_lossy().into_owned(),
            source,
        })?;
        debug!(target: LOG_TARGET, %status, "formatter finished");
        Ok(status.code().unwrap_or(1))
    }
}

/// Locates `git-clang-format`.
///
/// An explicit path wins. Otherwise a copy installed beside the running
/// executable is preferred, falling back to a `PATH` lookup by name.
#[must_use]
pub fn locate_git_clang_format(configured: Option<&Utf8Path>) -> PathBuf {
    if let Some(path) = configured {
        return path.as_std_path().to_path_buf();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(GIT_CLANG_FORMAT)))
        .filter(|candidate| candidate.is_file())
        .unwrap_or_else(|| PathBuf::from(GIT_CLANG_FORMAT))
}

/// Renders a command line for diagnostics.
#[must_use]
pub fn describe(command: &Command) -> String {
    std::iter::once(command.get_program().to_os_string())
        .chain(command.get_args().map(ToOwned::to_owned))
        .map(|part: OsString| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<Utf8PathBuf> {
        vec![Utf8PathBuf::from("foo.cpp"), Utf8PathBuf::from("bar.h")]
    }

    #[test]
    fn diff_scope_drives_git_clang_format() {
        let files = files();
        let request = FormatRequest {
            scope: FormatScope::Diff,
            binary: Utf8Path::new("/cache/clang-format-abc"),
            git_clang_format: Path::new("/opt/hooks/git-clang-format"),
            files: &files,
        };

        assert_eq!(
            describe(&request.command()),
            "/opt/hooks/git-clang-format -f --binary /cache/clang-format-abc -- foo.cpp bar.h"
        );
    }

    #[test]
    fn whole_file_scope_runs_binary_in_place() {
        let files = files();
        let request = FormatRequest {
            scope: FormatScope::WholeFile,
            binary: Utf8Path::new("/cache/clang-format-abc"),
            git_clang_format: Path::new(GIT_CLANG_FORMAT),
            files: &files,
        };

        assert_eq!(
            describe(&request.command()),
            "/cache/clang-format-abc -i -- foo.cpp bar.h"
        );
    }

    #[test]
    fn scope_values_match_hook_arguments() {
        let names: Vec<_> = FormatScope::value_variants()
            .iter()
            .filter_map(|scope| scope.to_possible_value())
            .map(|value| value.get_name().to_owned())
            .collect();
        assert_eq!(names, ["diff", "whole-file"]);
    }

    #[test]
    fn configured_git_clang_format_wins() {
        let located = locate_git_clang_format(Some(Utf8Path::new("/custom/git-clang-format")));
        assert_eq!(located, PathBuf::from("/custom/git-clang-format"));
    }

    #[test]
    fn spawn_failure_names_program() {
        let files = files();
        let request = FormatRequest {
            scope: FormatScope::WholeFile,
            binary: Utf8Path::new("/definitely/not/here/clang-format"),
            git_clang_format: Path::new(GIT_CLANG_FORMAT),
            files: &files,
        };

        let err = request.run().expect_err("missing binary");
        assert!(matches!(
            err,
            ToolError::Spawn { ref program, .. } if program.ends_with("clang-format")
        ));
    }
}
