//! Smoke tests to verify command module wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn bazaar() -> Command {
    let mut cmd = Command::cargo_bin("bazaar").unwrap();
    cmd.env_remove("BAZAAR_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_top_level_help_lists_commands() {
    bazaar()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("feed"))
        .stdout(predicate::str::contains("register"));
}

#[test]
fn test_feed_help() {
    bazaar()
        .arg("feed")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile id to compute"));
}

#[test]
fn test_migrate_help() {
    bazaar()
        .arg("migrate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--grants"));
}

#[test]
fn test_search_requires_keyword() {
    bazaar()
        .arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<KEYWORD>"));
}

// === Config Command Tests ===

#[test]
fn test_config_path_honours_flag() {
    bazaar()
        .args(["--config", "/tmp/bazaar-smoke.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/bazaar-smoke.toml"));
}

#[test]
fn test_config_init_then_show_masks_passwords() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let path_arg = path.to_str().unwrap();

    bazaar()
        .args(["--config", path_arg, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));
    assert!(path.exists());

    // Second init without --force refuses to overwrite
    bazaar()
        .args(["--config", path_arg, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    bazaar()
        .args(["--config", path_arg, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("adverts_db"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("anon").not());
}
