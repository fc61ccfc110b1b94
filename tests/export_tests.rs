use predicates::str::contains;
use std::fs;

mod common;
use common::{TestEnv, init_school};

const DAY: &str = "2025-10-06";

/// Alice present, Bob late on DAY; Carol absent.
fn school_day(env: &TestEnv) {
    init_school(env);
    env.cmd()
        .args(["scan", "MPASAT2501", "--date", DAY, "--time", "07:55"])
        .assert()
        .success();
    env.cmd()
        .args(["scan", "MPASAT2502", "--date", DAY, "--time", "08:17"])
        .assert()
        .success();
}

#[test]
fn test_export_csv_single_day_includes_absentees() {
    let env = TestEnv::new();
    school_day(&env);
    let out = env.out("report.csv");

    env.cmd()
        .args(["export", "--format", "csv", "--file", &out, "--range", DAY])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read exported csv");
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("date,person_type,code,name,class,arrival,departure,status,minutes_late")
    );
    assert!(content.contains("MPASAT2501,Alice,Form 1,07:55:00,,present,0"));
    assert!(content.contains("MPASAT2502,Bob,Form 1,08:17:00,,late,17"));
    assert!(content.contains("MPASAT2503,Carol,Form 2,,,absent,0"));
}

#[test]
fn test_export_json_range_only_days_with_events() {
    let env = TestEnv::new();
    school_day(&env);
    env.cmd()
        .args(["scan", "MPASAT2503", "--date", "2025-10-08", "--time", "07:59"])
        .assert()
        .success();
    let out = env.out("october.json");

    env.cmd()
        .args(["export", "--format", "json", "--file", &out, "--range", "2025-10"])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("read exported json");
    let rows: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let rows = rows.as_array().expect("array");

    // two days with events, three students each
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|r| r["date"] == "2025-10-06" || r["date"] == "2025-10-08"));
}

#[test]
fn test_export_range_without_events_writes_nothing() {
    let env = TestEnv::new();
    school_day(&env);
    let out = env.out("empty.csv");

    env.cmd()
        .args(["export", "--format", "csv", "--file", &out, "--range", "2024-01-01:2024-01-31"])
        .assert()
        .success()
        .stdout(contains("No attendance found"));

    assert!(!std::path::Path::new(&out).exists());
}

#[test]
fn test_export_xlsx_and_pdf_are_written() {
    let env = TestEnv::new();
    school_day(&env);

    let xlsx = env.out("report.xlsx");
    env.cmd()
        .args(["export", "--format", "xlsx", "--file", &xlsx, "--range", DAY])
        .assert()
        .success();
    let bytes = fs::read(&xlsx).expect("read xlsx");
    assert!(bytes.starts_with(b"PK"));

    let pdf = env.out("report.pdf");
    env.cmd()
        .args(["export", "--format", "pdf", "--file", &pdf, "--range", DAY])
        .assert()
        .success();
    let bytes = fs::read(&pdf).expect("read pdf");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_export_existing_file_needs_force() {
    let env = TestEnv::new();
    school_day(&env);
    let out = env.out("again.csv");
    fs::write(&out, "old").expect("seed file");

    env.cmd()
        .args(["export", "--format", "csv", "--file", &out, "--range", DAY])
        .write_stdin("n\n")
        .assert()
        .failure()
        .stderr(contains("Export cancelled"));
    assert_eq!(fs::read_to_string(&out).expect("read"), "old");

    env.cmd()
        .args(["export", "--format", "csv", "--file", &out, "--range", DAY, "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&out).expect("read").contains("Carol"));
}

#[test]
fn test_export_bad_range_fails() {
    let env = TestEnv::new();
    school_day(&env);
    let out = env.out("bad.csv");

    env.cmd()
        .args(["export", "--format", "csv", "--file", &out, "--range", "2025-13"])
        .assert()
        .failure();
}
