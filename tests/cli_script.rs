mod common;

use std::{fs, path::Path};

use assert_cmd::{assert::Assert, Command};
use chrono::{Datelike, Utc};
use predicates::str::contains;

use common::temp_home;

fn run_script(home: &Path, script: &str) -> Assert {
    Command::cargo_bin("neon_budget_cli")
        .unwrap()
        .env("NEON_BUDGET_HOME", home)
        .env("NEON_BUDGET_CLI_SCRIPT", "1")
        .env_remove("NEON_BUDGET_ASSUME_YES")
        .env_remove("RUST_LOG")
        .write_stdin(script.to_string())
        .assert()
}

fn run_script_confirmed(home: &Path, script: &str) -> Assert {
    Command::cargo_bin("neon_budget_cli")
        .unwrap()
        .env("NEON_BUDGET_HOME", home)
        .env("NEON_BUDGET_CLI_SCRIPT", "1")
        .env("NEON_BUDGET_ASSUME_YES", "1")
        .env_remove("RUST_LOG")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn script_mode_records_and_lists_transactions() {
    let home = temp_home();
    run_script(
        &home,
        "tx add expense food 12.5 2024-06-01 Lunch out\ntx list\nexit\n",
    )
    .success()
    .stdout(contains("Transaction added: 2024-06-01 Food -₱12.50"))
    .stdout(contains("Initial Deposit"))
    .stdout(contains("Lunch out"));
}

#[test]
fn data_survives_between_runs() {
    let home = temp_home();
    run_script(&home, "tx add expense Transport 3 2024-06-02 Bus fare\n").success();

    run_script(&home, "history bus\n")
        .success()
        .stdout(contains("Bus fare"))
        .stdout(contains("1 result(s), filter: all"));
}

#[test]
fn clear_is_declined_unless_confirmed() {
    let home = temp_home();
    run_script(&home, "tx clear\ntx list\n")
        .success()
        .stdout(contains(
            "Are you sure? This will wipe all current transactions. (no)",
        ))
        .stdout(contains("Clear cancelled."))
        .stdout(contains("Initial Deposit"));

    run_script_confirmed(&home, "tx clear\ntx list\n")
        .success()
        .stdout(contains("All transactions cleared."))
        .stdout(contains("No transactions recorded."));
}

#[test]
fn unknown_command_suggests_the_closest_match() {
    let home = temp_home();
    run_script(&home, "hisotry\n")
        .success()
        .stdout(contains("Unknown command `hisotry`"))
        .stdout(contains("Suggestion: `history`?"));
}

#[test]
fn invalid_arguments_report_usage_and_keep_running() {
    let home = temp_home();
    run_script(&home, "tx add expense Food lots\ntx add income Gift 20\ntx list\n")
        .success()
        .stdout(contains("invalid amount `lots`"))
        .stdout(contains("hint: Use `help <command>` for usage details."))
        .stdout(contains("+₱20.00"));
}

#[test]
fn empty_id_is_rejected_without_deleting() {
    let home = temp_home();
    run_script(&home, "tx delete \"\"\ntx list\n")
        .success()
        .stdout(contains("an id is required"))
        .stdout(contains("Initial Deposit"));
}

#[test]
fn export_then_import_round_trips_through_files() {
    let home = temp_home();
    let out = home.join("exports");
    run_script(
        &home,
        &format!(
            "tx add expense Utilities 60 2024-06-05 Power bill\ndata export {}\n",
            out.display()
        ),
    )
    .success()
    .stdout(contains("Exported 2 transactions to"));

    let exported = fs::read_dir(&out)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("neon_budget_backup_"))
        })
        .expect("export file written");
    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&exported).unwrap()).unwrap();
    let rows = document.as_array().expect("export is a JSON array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["type"], "expense");
    assert_eq!(rows[0]["description"], "Power bill");

    let bad = home.join("bad.json");
    fs::write(&bad, r#"{"transactions": []}"#).unwrap();

    run_script(
        &home,
        &format!(
            "data import {}\ndata import {}\nhistory power\n",
            bad.display(),
            exported.display()
        ),
    )
    .success()
    .stdout(contains("Invalid backup file"))
    .stdout(contains("Import complete: 2 transactions loaded."))
    .stdout(contains("Power bill"));
}

#[test]
fn backups_can_be_created_and_restored() {
    let home = temp_home();
    run_script_confirmed(
        &home,
        "backup create\ntx add expense Food 4 2024-06-03 Snack\nbackup list\n",
    )
    .success()
    .stdout(contains("Backup created: Snapshot"))
    .stdout(contains("(1 items,"));

    let listing = run_script(&home, "backup list\n").success();
    let stdout = String::from_utf8(listing.get_output().stdout.clone()).unwrap();
    let id = stdout
        .lines()
        .find(|line| line.contains("Snapshot"))
        .and_then(|line| line.split_whitespace().next())
        .expect("backup row")
        .to_string();

    run_script_confirmed(&home, &format!("backup restore {id}\nhistory snack\n"))
        .success()
        .stdout(contains("Backup restored: 1 transactions loaded."))
        .stdout(contains("No matching transactions."));
}

#[test]
fn auto_template_generates_on_its_day() {
    let home = temp_home();
    let day = Utc::now().day();
    run_script(
        &home,
        &format!(
            "template add Rent expense housing 900 --day {day} --auto\ntemplate list\ntx list\n"
        ),
    )
    .success()
    .stdout(contains("Template added: Rent"))
    .stdout(contains("Generated 1 recurring transaction(s)."))
    .stdout(contains("Rent (Auto-generated)"));
}

#[test]
fn loan_plan_can_be_saved_as_template() {
    let home = temp_home();
    run_script(
        &home,
        "loan 12000 5 12 --lender Acme --save --day 28\ntemplate list\n",
    )
    .success()
    .stdout(contains("Monthly payment"))
    .stdout(contains("₱1,027.29"))
    .stdout(contains("Template added: Acme Loan"))
    .stdout(contains("Loan Payment"));
}

#[test]
fn theme_and_config_changes_persist() {
    let home = temp_home();
    run_script(&home, "theme ocean\nconfig currency_symbol $\n")
        .success()
        .stdout(contains("Theme set to Midnight Ocean"))
        .stdout(contains("Config updated: currency_symbol = $"));

    run_script(&home, "theme\nsummary\n")
        .success()
        .stdout(contains("* ocean"))
        .stdout(contains("Balance      : $5,000.00"));

    run_script(&home, "theme neon\n")
        .success()
        .stdout(contains("unknown theme `neon`"));
}

#[test]
fn version_and_help_are_available() {
    let home = temp_home();
    run_script(&home, "version\nhelp\nhelp tx\n")
        .success()
        .stdout(contains("Neon Budget"))
        .stdout(contains("Available commands"))
        .stdout(contains("Help: tx"))
        .stdout(contains("tx from-template"));
}
