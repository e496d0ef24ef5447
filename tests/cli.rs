use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mimi(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mimi").unwrap();
    cmd.env("MIMI_LEDGER_DATA_DIR", dir.path())
        .env_remove("MIMI_LEDGER_LOG");
    cmd
}

fn added_id(output: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(output);
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Added "))
        .and_then(|rest| rest.strip_suffix(':'))
        .expect("add prints the new id")
        .to_string()
}

#[test]
fn test_commands_require_sign_in() {
    let dir = TempDir::new().unwrap();

    mimi(&dir)
        .args(["add", "Lunch", "25"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));

    mimi(&dir)
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_monthly_balance_after_adding_records() {
    let dir = TempDir::new().unwrap();

    mimi(&dir)
        .args(["login", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as alice"));

    mimi(&dir)
        .args(["add", "Salary", "100", "--type", "income"])
        .assert()
        .success();
    mimi(&dir)
        .args(["add", "Groceries", "40", "--type", "expense"])
        .assert()
        .success();

    mimi(&dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("¥60.00"));

    mimi(&dir)
        .args(["list", "--search", "groc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Salary").not())
        .stdout(predicate::str::contains("Filtered from 2 record(s)"));

    mimi(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Filtered from").not());
}

#[test]
fn test_records_are_scoped_to_the_signed_in_user() {
    let dir = TempDir::new().unwrap();

    mimi(&dir).args(["login", "alice"]).assert().success();
    mimi(&dir)
        .args(["add", "Rent", "1200", "--type", "estimated_expense"])
        .assert()
        .success();

    mimi(&dir).args(["login", "bob"]).assert().success();
    mimi(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent").not());
}

#[test]
fn test_realize_moves_estimate_into_actual_income() {
    let dir = TempDir::new().unwrap();

    mimi(&dir).args(["login", "alice"]).assert().success();
    let output = mimi(&dir)
        .args(["add", "Consulting", "1200", "--type", "预估收入"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = added_id(&output.stdout);

    mimi(&dir)
        .arg("outstanding")
        .assert()
        .success()
        .stdout(predicate::str::contains("Consulting"));

    mimi(&dir)
        .args(["realize", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Realized"))
        .stdout(predicate::str::contains("收入"));

    mimi(&dir)
        .arg("outstanding")
        .assert()
        .success()
        .stdout(predicate::str::contains("No outstanding"));

    // Actual income cannot be realized again
    mimi(&dir).args(["realize", &id]).assert().failure();
}

#[test]
fn test_delete_requires_force() {
    let dir = TempDir::new().unwrap();

    mimi(&dir).args(["login", "alice"]).assert().success();
    let output = mimi(&dir).args(["add", "Taxi", "30"]).output().unwrap();
    let id = added_id(&output.stdout);

    mimi(&dir)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --force"));
    mimi(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Taxi"));

    mimi(&dir)
        .args(["delete", &id, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted record"));
    mimi(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Taxi").not());
}

#[test]
fn test_export_then_import_skips_existing_records() {
    let dir = TempDir::new().unwrap();
    let export_path = dir.path().join("backup.csv");
    let export_arg = export_path.to_str().unwrap();

    mimi(&dir).args(["login", "alice"]).assert().success();
    mimi(&dir)
        .args(["add", "Client, Inc.", "800", "--type", "income"])
        .assert()
        .success();

    mimi(&dir)
        .args(["export", export_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 record(s)"));

    mimi(&dir)
        .args(["import", export_arg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing new to import"));

    // A different user has none of these yet
    mimi(&dir).args(["login", "bob"]).assert().success();
    mimi(&dir)
        .args(["import", export_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 record(s)"));
    mimi(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Client, Inc."));
}

#[test]
fn test_unknown_setting_is_rejected() {
    let dir = TempDir::new().unwrap();

    mimi(&dir)
        .args(["config", "set", "currency_symbol", "$"])
        .assert()
        .success();
    mimi(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("currency_symbol: $"));

    mimi(&dir)
        .args(["config", "set", "theme", "dark"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));
}
