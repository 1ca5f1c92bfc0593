//! Formats files with a pinned `clang-format` release.
//!
//! `clang-format-hook <VERSION> <diff|whole-file> [FILES]...`
//!
//! The binary for `VERSION` is downloaded into the shared cache on first use
//! and verified against its pinned sha1 on every run. In `diff` scope only the
//! lines touched by the pending change are formatted, via `git-clang-format`;
//! in `whole-file` scope the files are rewritten in place. The formatter's
//! exit status becomes the hook's exit status. Cache failures exit with `1`.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use precommit_hooks::{ClangFormatVersion, FormatScope, HookEnvCfg, pins, run_clang_format};

#[derive(Debug, Parser)]
#[command(name = "clang-format-hook", about = "Runs a pinned clang-format on changed files")]
struct Cli {
    /// clang-format version to run.
    #[arg(value_parser = version_parser())]
    version: ClangFormatVersion,
    /// Format only changed lines (`diff`) or entire files (`whole-file`).
    #[arg(value_enum)]
    scope: FormatScope,
    /// Files pre-commit believes are changed.
    files: Vec<Utf8PathBuf>,
}

fn version_parser() -> impl TypedValueParser<Value = ClangFormatVersion> {
    PossibleValuesParser::new(pins::available_versions().map(|version| version.to_string()))
        .try_map(|raw| raw.parse::<ClangFormatVersion>())
}

fn main() -> color_eyre::eyre::Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let cfg = HookEnvCfg::load()?;
    precommit_hooks::observability::init_tracing(cfg.level()?);

    let code = run_clang_format(&cfg, cli.version, cli.scope, &cli.files)?;
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
