//! Fails a commit when a staged file contains `DO NOT SUBMIT`.
//!
//! `check-do-not-submit [FILES]...`
//!
//! Exits `0` when no file contains the marker, `1` after printing every match
//! as `path:line:text`, and `2` when `git grep` itself cannot run or the
//! `PRECOMMIT_HOOKS_*` settings are malformed.

use std::io::Write;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use precommit_hooks::HookEnvCfg;
use precommit_hooks::marker::{self, DO_NOT_SUBMIT, ScanOutcome};
use precommit_hooks::observability;

/// Exit code for tooling or invocation failures.
const TOOL_FAILURE: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "check-do-not-submit",
    about = "Checks files for the string \"DO NOT SUBMIT\""
)]
struct Cli {
    /// Files to scan.
    files: Vec<Utf8PathBuf>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { TOOL_FAILURE } else { 0 };
            drop(err.print());
            return ExitCode::from(code);
        }
    };

    let mut stderr = std::io::stderr().lock();
    let level = match HookEnvCfg::load().and_then(|cfg| cfg.level()) {
        Ok(level) => level,
        Err(err) => {
            drop(writeln!(stderr, "Error: {err}"));
            return ExitCode::from(TOOL_FAILURE);
        }
    };
    observability::init_tracing(level);

    let code = match marker::scan(&cli.files) {
        Ok(outcome) => {
            if let ScanOutcome::Found { matches } = &outcome {
                drop(writeln!(
                    stderr,
                    "Error: The string \"{DO_NOT_SUBMIT}\" was found!\n{matches}"
                ));
            }
            outcome.exit_code()
        }
        Err(err) => {
            drop(writeln!(stderr, "Error invoking git grep: {err}"));
            TOOL_FAILURE
        }
    };
    ExitCode::from(code)
}
