//! CLI output integration tests.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

use ctfpipe::testkit::config::MINIMAL_TOML;

fn ctfpipe() -> Command {
    let mut cmd = cargo_bin_cmd!("ctfpipe");
    cmd.env_remove("WALLET_PRIVATE_KEY");
    cmd
}

#[test]
fn test_help_lists_commands() {
    ctfpipe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("price"))
        .stdout(predicate::str::contains("quote"))
        .stdout(predicate::str::contains("add-funding"))
        .stdout(predicate::str::contains("proxy"));
}

#[test]
fn test_version() {
    ctfpipe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ctfpipe"));
}

#[test]
fn test_price_prints_each_outcome() {
    ctfpipe()
        .args(["--color", "never", "price", "--holdings", "150,50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Outcome 0"))
        .stdout(predicate::str::contains("0.250000"))
        .stdout(predicate::str::contains("0.750000"));
}

#[test]
fn test_price_json_mode() {
    ctfpipe()
        .args(["--json", "price", "--holdings", "150,50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\":\"price\""));
}

#[test]
fn test_equal_odds_need_no_hint() {
    ctfpipe()
        .args(["--color", "never", "hint", "--odds", "50,50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no hint needed"));
}

#[test]
fn test_empty_pool_buy_quote_is_zero() {
    ctfpipe()
        .args([
            "--color", "never", "quote", "buy", "--holdings", "0,0", "--outcome", "0", "--amount",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy Quote"));
}

#[test]
fn test_invalid_holdings_are_rejected() {
    ctfpipe()
        .args(["price", "--holdings", "ten"])
        .assert()
        .failure();
}

#[test]
fn test_config_validate_warns_about_unset_proxy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, MINIMAL_TOML).unwrap();

    ctfpipe()
        .args(["--color", "never", "config", "validate", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Config file is valid"))
        .stdout(predicate::str::contains("proxy.address is unset"));
}

#[test]
fn test_missing_config_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();

    ctfpipe()
        .args(["--color", "never", "config", "show", "--config"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn test_buy_without_key_fails_before_touching_the_network() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, MINIMAL_TOML).unwrap();

    ctfpipe()
        .args([
            "--color",
            "never",
            "buy",
            "--market",
            "0x3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a",
            "--outcome",
            "0",
            "--amount",
            "1.5",
            "--dry-run",
            "--config",
        ])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WALLET_PRIVATE_KEY"));
}
