//! Smoke tests for the server binary's command line

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_database_flags() {
    let mut cmd = Command::cargo_bin("product-api").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--db-host"))
        .stdout(predicate::str::contains("--product-table"))
        .stdout(predicate::str::contains("DB_POOL_SIZE"));
}

#[test]
fn test_rejects_invalid_table_name() {
    let mut cmd = Command::cargo_bin("product-api").unwrap();
    cmd.env_remove("DATABASE_URL")
        .arg("--product-table")
        .arg("products;drop");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid table name"));
}

#[test]
fn test_rejects_non_numeric_port() {
    let mut cmd = Command::cargo_bin("product-api").unwrap();
    cmd.arg("--port").arg("eighty");

    cmd.assert().failure();
}
