use assert_cmd::Command;
use predicates::prelude::*;

fn intlog() -> Command {
    let mut cmd = Command::cargo_bin("intlog").unwrap();
    cmd.env_remove("INTLOG_SERVICE_HOST")
        .env_remove("INTLOG_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    intlog()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("record"));
}

#[test]
fn test_search_without_host_fails() {
    intlog()
        .arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not initialized"));
}

#[test]
fn test_show_without_host_fails() {
    intlog()
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch transaction '42'"));
}

#[test]
fn test_record_rejects_malformed_meta() {
    intlog()
        .args([
            "record",
            "--sync-type",
            "daily_sync",
            "--vendor",
            "acme",
            "--credential-id",
            "cred-1",
            "--meta",
            "status",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[test]
fn test_record_reports_remote_failure() {
    intlog()
        .args([
            "record",
            "--sync-type",
            "daily_sync",
            "--vendor",
            "acme",
            "--credential-id",
            "cred-1",
            "--finish",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Logging service call failed"))
        .stderr(predicate::str::contains("daily_sync-acme-cred-1"));
}
