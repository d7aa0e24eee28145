//! End-to-end CLI tests for chatdump.
//!
//! These run the actual binary. Everything here fails or finishes before the
//! first network request, so no Discord account is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn chatdump() -> Command {
    let mut cmd = Command::cargo_bin("chatdump").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Help and version
// ============================================================================

#[test]
fn test_help() {
    chatdump()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Export a Discord channel"))
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("--no-input"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_version() {
    chatdump()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_flag() {
    chatdump().arg("--frobnicate").assert().failure().code(2);
}

#[test]
fn test_invalid_log_level() {
    chatdump()
        .args(["--log-level", "loud", "123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("loud"));
}

// ============================================================================
// Failures before any request
// ============================================================================

#[test]
fn test_no_input_without_token_is_a_login_failure() {
    let dir = tempdir().unwrap();
    chatdump()
        .args(["--no-input", "123"])
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Login failed"));
}

#[test]
fn test_invalid_channel_link() {
    let dir = tempdir().unwrap();
    chatdump()
        .args(["--token", "not-a-real-token", "--no-input", "general"])
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("general"))
        .stderr(predicate::str::contains("Login failed").not());
}

#[test]
fn test_missing_channel_with_no_input() {
    let dir = tempdir().unwrap();
    chatdump()
        .args(["--token", "not-a-real-token", "--no-input"])
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no channel given"));
}

#[test]
fn test_existing_export_directory_is_refused() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("taken")).unwrap();

    chatdump()
        .args(["--token", "not-a-real-token", "--no-input", "--name", "taken"])
        .arg("https://discord.com/channels/1/381887113391505410")
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}
