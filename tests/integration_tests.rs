use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{EMAIL, PASSWORD, Sandbox};

#[test]
fn test_init_creates_database() {
    let sb = Sandbox::new();

    sb.pacer()
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("Pacer initialization completed"));

    assert!(std::path::Path::new(&sb.db).exists());
}

#[test]
fn test_chart_without_session_shows_sign_in() {
    let sb = Sandbox::new().init();

    sb.pacer()
        .arg("chart")
        .assert()
        .success()
        .stdout(contains("Sign In to Pacer"))
        .stdout(contains("Velocity").not());
}

#[test]
fn test_add_requires_session() {
    let sb = Sandbox::new().init();

    sb.pacer()
        .args(["add", "--date", "2024-01-01", "--hours", "2"])
        .assert()
        .failure()
        .stderr(contains("Not signed in"));
}

#[test]
fn test_signup_then_add_projects_both_series() {
    let sb = Sandbox::signed_in();

    sb.pacer()
        .args(["add", "--date", "2024-01-01", "--hours", "2"])
        .assert()
        .success()
        .stdout(contains("Velocity: Target Completion"))
        .stdout(contains("Ideal Pace: 96.5 hrs left"))
        .stdout(contains("Actual Pace: 98 hrs left"));

    sb.pacer()
        .args(["add", "--date", "2024-01-02", "--hours", "4"])
        .assert()
        .success()
        .stdout(contains("Ideal Pace: 93 hrs left"))
        .stdout(contains("Actual Pace: 94 hrs left"));
}

#[test]
fn test_add_with_empty_date_is_rejected() {
    let sb = Sandbox::signed_in();

    sb.pacer()
        .args(["add", "--hours", "2"])
        .assert()
        .failure()
        .stderr(contains("Please fill in both fields!"));

    sb.pacer()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No logged days."));
}

#[test]
fn test_add_rejects_bad_values() {
    let sb = Sandbox::signed_in();

    sb.pacer()
        .args(["add", "--date", "2024-01-01", "--hours", "-1"])
        .assert()
        .failure()
        .stderr(contains("Invalid hours"));

    sb.pacer()
        .args(["add", "--date", "2024-02-30", "--hours", "1"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}

#[test]
fn test_backdated_entry_is_charted_in_date_order() {
    let sb = Sandbox::signed_in();
    sb.add("2024-01-05", "3");
    sb.add("2024-01-01", "1");

    let out = sb.pacer().arg("list").assert().success().get_output().stdout.clone();
    let text = String::from_utf8_lossy(&out);

    let first = text.find("2024-01-01").expect("first day listed");
    let second = text.find("2024-01-05").expect("second day listed");
    assert!(first < second);

    // the backdated day is now the first point of the series
    sb.pacer()
        .arg("chart")
        .assert()
        .success()
        .stdout(contains("2024-01-01  Ideal Pace: 96.5 hrs left"))
        .stdout(contains("Actual Pace: 99 hrs left"))
        .stdout(contains("Actual Pace: 96 hrs left"));
}

#[test]
fn test_duplicate_days_are_kept_apart() {
    let sb = Sandbox::signed_in();
    sb.add("2024-01-01", "1");
    sb.add("2024-01-01", "2");

    sb.pacer()
        .arg("chart")
        .assert()
        .success()
        .stdout(contains("Ideal Pace: 93 hrs left"))
        .stdout(contains("Actual Pace: 97 hrs left"));
}

#[test]
fn test_login_with_wrong_password_fails() {
    let sb = Sandbox::signed_in();

    sb.pacer()
        .args(["login", "--email", EMAIL, "--password", "nope-nope"])
        .assert()
        .failure()
        .stderr(contains("Invalid login credentials"));
}

#[test]
fn test_logout_then_login_again() {
    let sb = Sandbox::signed_in();
    sb.add("2024-01-01", "2");

    sb.pacer()
        .arg("logout")
        .assert()
        .success()
        .stdout(contains("Signed out."));

    sb.pacer()
        .arg("status")
        .assert()
        .success()
        .stdout(contains("not signed in"));

    sb.pacer()
        .arg("chart")
        .assert()
        .success()
        .stdout(contains("Sign In to Pacer"));

    sb.pacer()
        .env("PACER_EMAIL", EMAIL)
        .env("PACER_PASSWORD", PASSWORD)
        .arg("login")
        .assert()
        .success()
        .stdout(contains(format!("Signed in as {EMAIL}")))
        .stdout(contains("Actual Pace: 98 hrs left"));
}

#[test]
fn test_status_reports_backend_and_user() {
    let sb = Sandbox::signed_in();

    sb.pacer()
        .arg("status")
        .assert()
        .success()
        .stdout(contains("local"))
        .stdout(contains(EMAIL))
        .stdout(contains("never"));
}

#[test]
fn test_internal_log_records_operations() {
    let sb = Sandbox::signed_in();
    sb.add("2024-01-01", "2");

    sb.pacer()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("signup"))
        .stdout(contains("2024-01-01"));
}

#[test]
fn test_db_info_and_check() {
    let sb = Sandbox::signed_in();
    sb.add("2024-01-01", "2");

    sb.pacer()
        .args(["db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("Local log entries"))
        .stdout(contains("Integrity check passed"));
}

#[test]
fn test_config_check_after_init() {
    let sb = Sandbox::new();

    // without --test the config file is written into the sandbox HOME
    sb.pacer().arg("init").assert().success();

    sb.pacer()
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("Configuration is complete"));

    sb.pacer()
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("backend: local"));
}

#[test]
fn test_list_shows_running_total_and_range() {
    let sb = Sandbox::signed_in();
    sb.add("2024-01-31", "2");
    sb.add("2024-02-01", "4.5");

    sb.pacer()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("2024-01-31"))
        .stdout(contains("6.5"));

    sb.pacer()
        .args(["list", "--range", "2024-02"])
        .assert()
        .success()
        .stdout(contains("2024-02-01"))
        .stdout(contains("2024-01-31").not());

    sb.pacer()
        .args(["list", "--range", "2023"])
        .assert()
        .success()
        .stdout(contains("No logged days."));
}
