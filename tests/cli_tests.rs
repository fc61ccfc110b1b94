use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{TestEnv, init_school};

const DAY: &str = "2025-10-06";

#[test]
fn test_init_creates_database() {
    let env = TestEnv::new();
    env.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(env.path().exists());
}

#[test]
fn test_student_registration_generates_codes() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["student", "--list"])
        .assert()
        .success()
        .stdout(contains("MPASAT2501"))
        .stdout(contains("MPASAT2502"))
        .stdout(contains("MPASAT2503"))
        .stdout(contains("Carol"));
}

#[test]
fn test_student_with_bad_phone_is_rejected() {
    let env = TestEnv::new();
    env.init();

    env.cmd()
        .args(["student", "--add", "Dan", "--class", "Form 1", "--phone", "12ab"])
        .assert()
        .failure()
        .stderr(contains("Phone number"));
}

#[test]
fn test_scan_arrival_departure_then_third_rejected() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "07:55"])
        .assert()
        .success()
        .stdout(contains("Arrival recorded for Alice"))
        .stdout(contains("present"));

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "15:10"])
        .assert()
        .success()
        .stdout(contains("Departure recorded for Alice"));

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "15:30"])
        .assert()
        .failure()
        .stderr(contains("already scanned twice"));
}

#[test]
fn test_scan_late_arrival_reports_minutes() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["scan", "MPASAT2502", "--date", DAY, "--time", "08:17"])
        .assert()
        .success()
        .stdout(contains("late"))
        .stdout(contains("17 min"));
}

#[test]
fn test_scan_departure_inside_duplicate_window_is_rejected() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "07:50:00"])
        .assert()
        .success();

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "07:50:20"])
        .assert()
        .failure()
        .stderr(contains("Duplicate scan"));
}

#[test]
fn test_scan_unknown_code_fails() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["scan", "NOPE99", "--date", DAY, "--time", "07:55"])
        .assert()
        .failure()
        .stderr(contains("Invalid code: NOPE99"));
}

#[test]
fn test_scan_malformed_time_fails() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "7h55"])
        .assert()
        .failure();

    env.cmd()
        .args(["list", "--date", DAY])
        .assert()
        .success()
        .stdout(contains("No attendance recorded"));
}

#[test]
fn test_list_shows_events_of_the_day() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "07:55"])
        .assert()
        .success();
    env.cmd()
        .args(["scan", "MPASAT2502", "--date", DAY, "--time", "08:05"])
        .assert()
        .success();

    env.cmd()
        .args(["list", "--date", DAY])
        .assert()
        .success()
        .stdout(contains("MPASAT2501"))
        .stdout(contains("MPASAT2502"))
        .stdout(contains("2 event(s)"));

    env.cmd()
        .args(["list", "--date", "2025-10-07"])
        .assert()
        .success()
        .stdout(contains("No attendance recorded"));
}

#[test]
fn test_report_lists_absent_students() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "07:55"])
        .assert()
        .success();
    env.cmd()
        .args(["scan", "MPASAT2502", "--date", DAY, "--time", "08:17"])
        .assert()
        .success();

    env.cmd()
        .args(["report", "--date", DAY])
        .assert()
        .success()
        .stdout(contains("Absent students (1)"))
        .stdout(contains("Carol"))
        .stdout(contains("MPASAT2503"));
}

#[test]
fn test_settings_rejects_start_after_end_and_keeps_values() {
    let env = TestEnv::new();
    env.init();

    env.cmd()
        .args(["settings", "--start", "09:00", "--end", "08:00"])
        .assert()
        .failure()
        .stderr(contains("must be before"));

    env.cmd()
        .arg("settings")
        .assert()
        .success()
        .stdout(contains("08:00"))
        .stdout(contains("15:00"));
}

#[test]
fn test_settings_change_affects_later_arrivals() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["settings", "--start", "07:30", "--end", "14:00"])
        .assert()
        .success()
        .stdout(contains("07:30"));

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "07:45"])
        .assert()
        .success()
        .stdout(contains("15 min"));
}

#[test]
fn test_year_list_marks_single_active() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["year", "--add", "2026-2027", "--start", "2026", "--end", "2027"])
        .assert()
        .success();
    env.cmd().args(["year", "--activate", "2"]).assert().success();

    env.cmd()
        .args(["year", "--list"])
        .assert()
        .success()
        .stdout(contains("2025-2026"))
        .stdout(contains("2026-2027"))
        .stdout(contains("active"));
}

#[test]
fn test_year_with_inverted_bounds_is_rejected() {
    let env = TestEnv::new();
    env.init();

    env.cmd()
        .args(["year", "--add", "bad", "--start", "2026", "--end", "2025"])
        .assert()
        .failure()
        .stderr(contains("must be before"));
}

#[test]
fn test_teacher_scan_is_recorded() {
    let env = TestEnv::new();
    init_school(&env);

    let out = env
        .cmd()
        .args([
            "teacher", "--add", "Mrs Ngo", "--id-card", "CM-0042", "--phone", "699000111", "--sex",
            "F",
        ])
        .assert()
        .success()
        .stdout(contains("MPASATT"))
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8_lossy(&out);
    let code = text
        .split_whitespace()
        .find(|w| w.starts_with("MPASATT"))
        .expect("teacher code in output")
        .to_string();

    env.cmd()
        .args(["scan", &code, "--date", DAY, "--time", "07:40"])
        .assert()
        .success()
        .stdout(contains("Arrival recorded for Mrs Ngo"));
}

#[test]
fn test_purge_with_yes_deletes_events() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "07:55"])
        .assert()
        .success();

    env.cmd()
        .args(["purge", "--year", "all", "--yes"])
        .assert()
        .success()
        .stdout(contains("Deleted 1 attendance record(s)"));

    env.cmd()
        .args(["list", "--date", DAY])
        .assert()
        .success()
        .stdout(contains("No attendance recorded"));
}

#[test]
fn test_purge_declined_keeps_events() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "07:55"])
        .assert()
        .success();

    env.cmd()
        .arg("purge")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Purge cancelled"));

    env.cmd()
        .args(["list", "--date", DAY])
        .assert()
        .success()
        .stdout(contains("MPASAT2501"));
}

#[test]
fn test_log_records_operations() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "07:55"])
        .assert()
        .success();

    env.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("checkin"))
        .stdout(contains("register"))
        .stdout(contains("migration_applied"));
}

#[test]
fn test_db_info_and_check() {
    let env = TestEnv::new();
    init_school(&env);

    env.cmd()
        .args(["db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));

    env.cmd()
        .args(["db", "--migrate"])
        .assert()
        .success()
        .stdout(contains("up to date"));
}

#[test]
fn test_backup_copies_database() {
    let env = TestEnv::new();
    init_school(&env);
    let dest = env.out("backup/attendlog-copy.sqlite");

    env.cmd()
        .args(["backup", "--file", &dest])
        .assert()
        .success();

    assert!(std::path::Path::new(&dest).exists());
}

#[test]
fn test_config_check_without_file_uses_defaults() {
    let env = TestEnv::new();

    env.cmd()
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("defaults are in use").or(contains("complete")));
}
