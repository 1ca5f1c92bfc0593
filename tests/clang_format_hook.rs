//! End-to-end checks for `clang-format-hook` that need no network access.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use color_eyre::eyre::{Context, Result, ensure, eyre};
use precommit_hooks::pins::pinned_hash;
use precommit_hooks::{ClangFormatVersion, Platform};
use tempfile::tempdir;

fn run_hook(cache_home: &Path, args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_clang-format-hook"))
        .current_dir(cache_home)
        .env("XDG_CACHE_HOME", cache_home)
        .env_remove("PRECOMMIT_HOOKS_CACHE_DIR")
        .env_remove("PRECOMMIT_HOOKS_DOWNLOAD_BASE_URL")
        .args(args)
        .output()
        .context("failed to run clang-format-hook")
}

#[test]
fn unknown_version_is_rejected_by_the_parser() -> Result<()> {
    let temp = tempdir()?;
    let output = run_hook(temp.path(), &["99.0.0", "diff", "foo.cc"])?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    ensure!(output.status.code() == Some(2), "expected exit 2, got {}", output.status);
    ensure!(stderr.contains("11.0.0"), "possible values should be listed: {stderr}");
    Ok(())
}

#[test]
fn unknown_scope_is_rejected_by_the_parser() -> Result<()> {
    let temp = tempdir()?;
    let output = run_hook(temp.path(), &["11.0.0", "everything", "foo.cc"])?;
    ensure!(output.status.code() == Some(2), "expected exit 2, got {}", output.status);
    Ok(())
}

#[test]
fn corrupted_cache_entry_fails_without_refetching() -> Result<()> {
    let Ok(platform) = Platform::current() else {
        // No pinned binaries for this platform.
        return Ok(());
    };
    let version = ClangFormatVersion::new(11, 0, 0);
    let hash = pinned_hash(version, platform).ok_or_else(|| eyre!("11.0.0 must be pinned"))?;

    let temp = tempdir()?;
    let cache_root = temp.path().join("pre-commit-hooks");
    fs::create_dir_all(&cache_root)?;
    let entry = cache_root.join(format!("clang-format-{hash}"));
    fs::write(&entry, b"definitely not clang-format")?;

    let output = run_hook(temp.path(), &["11.0.0", "whole-file", "foo.cc"])?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    ensure!(output.status.code() == Some(1), "expected exit 1, got {}", output.status);
    ensure!(stderr.contains("sha1 mismatch"), "unexpected stderr: {stderr}");
    ensure!(stderr.contains(hash), "expected hash should be reported: {stderr}");
    ensure!(
        fs::read(&entry)? == b"definitely not clang-format",
        "corrupted entry must be left for the operator"
    );
    Ok(())
}

#[cfg(unix)]
#[test]
fn formatter_exit_code_is_propagated() -> Result<()> {
    use camino::Utf8PathBuf;
    use precommit_hooks::FormatScope;
    use precommit_hooks::format::{FormatRequest, GIT_CLANG_FORMAT};
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir()?;
    let script_path = temp.path().join("fake-clang-format");
    fs::write(&script_path, "#!/bin/sh\nexit 3\n")?;
    fs::set_permissions(&script_path, fs::Permissions::from_mode(0o755))?;
    let script = Utf8PathBuf::from_path_buf(script_path)
        .map_err(|path| eyre!("non-UTF-8 temp path: {}", path.display()))?;

    let files = vec![Utf8PathBuf::from("foo.cc")];
    let request = FormatRequest {
        scope: FormatScope::WholeFile,
        binary: &script,
        git_clang_format: Path::new(GIT_CLANG_FORMAT),
        files: &files,
    };

    ensure!(request.run()? == 3, "formatter status must pass through");
    Ok(())
}
