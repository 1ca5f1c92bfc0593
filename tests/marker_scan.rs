//! Runs `check-do-not-submit` against real files through `git grep`.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use color_eyre::eyre::{Context, Result, ensure};
use rstest::rstest;
use tempfile::tempdir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

fn run_hook(dir: &Path, files: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_check-do-not-submit"))
        .current_dir(dir)
        .args(files)
        .output()
        .context("failed to run check-do-not-submit")
}

#[rstest]
#[case::single_line("// DO NOT SUBMIT\n")]
#[case::trailing_text("int x = 0;  // DO NOT SUBMIT: debugging\n")]
fn marker_blocks_the_commit(#[case] contents: &str) -> Result<()> {
    if !git_available() {
        return Ok(());
    }
    let temp = tempdir()?;
    fs::write(temp.path().join("clean.cc"), "int main() {}\n")?;
    fs::write(temp.path().join("dirty.cc"), format!("#include <x>\n{contents}"))?;

    let output = run_hook(temp.path(), &["clean.cc", "dirty.cc"])?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    ensure!(output.status.code() == Some(1), "expected exit 1, got {}", output.status);
    ensure!(
        stderr.contains("The string \"DO NOT SUBMIT\" was found!"),
        "missing banner in {stderr}"
    );
    ensure!(stderr.contains("dirty.cc:2:"), "missing match location in {stderr}");
    ensure!(!stderr.contains("clean.cc"), "clean file reported in {stderr}");
    Ok(())
}

#[test]
fn clean_files_pass_silently() -> Result<()> {
    if !git_available() {
        return Ok(());
    }
    let temp = tempdir()?;
    fs::write(temp.path().join("a.cc"), "// do not submit, lowercase is fine\n")?;
    fs::write(temp.path().join("b.h"), "#pragma once\n")?;

    let output = run_hook(temp.path(), &["a.cc", "b.h"])?;

    ensure!(output.status.success(), "expected exit 0, got {}", output.status);
    ensure!(output.stdout.is_empty(), "unexpected stdout");
    ensure!(output.stderr.is_empty(), "unexpected stderr");
    Ok(())
}

#[test]
fn no_files_is_clean() -> Result<()> {
    let temp = tempdir()?;
    let output = run_hook(temp.path(), &[])?;
    ensure!(output.status.success(), "expected exit 0, got {}", output.status);
    Ok(())
}

#[test]
fn malformed_log_level_is_a_tool_failure() -> Result<()> {
    let temp = tempdir()?;
    let output = Command::new(env!("CARGO_BIN_EXE_check-do-not-submit"))
        .current_dir(temp.path())
        .env("PRECOMMIT_HOOKS_LOG_LEVEL", "chatty")
        .output()
        .context("failed to run check-do-not-submit")?;
    let stderr = String::from_utf8_lossy(&output.stderr);

    ensure!(output.status.code() == Some(2), "expected exit 2, got {}", output.status);
    ensure!(stderr.contains("chatty"), "offending value should be named: {stderr}");
    Ok(())
}
