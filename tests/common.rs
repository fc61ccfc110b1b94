#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use attendlog::core::{academic_year, registry};
use attendlog::db::initialize::init_db;
use attendlog::db::pool::DbPool;
use attendlog::models::academic_year::{AcademicYear, NewAcademicYear, YearStatus};
use attendlog::models::person::{NewStudent, NewTeacher, Student, Teacher};
use std::path::PathBuf;
use tempfile::TempDir;

pub const PREFIX: &str = "MPASAT";

/// Isolated environment: a temp HOME (so no real config is read) and a DB inside it.
pub struct TestEnv {
    pub dir: TempDir,
    pub db: String,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let db = dir.path().join("attendlog.sqlite").to_string_lossy().to_string();
        Self { dir, db }
    }

    /// `attendlog --db <db> --test ...` with HOME pointed at the temp dir.
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("attendlog");
        cmd.env("HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("ATTENDLOG_API_KEY")
            .args(["--db", &self.db, "--test"]);
        cmd
    }

    pub fn init(&self) {
        self.cmd().arg("init").assert().success();
    }

    /// Path for an output file inside the temp dir.
    pub fn out(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().to_string()
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.db)
    }

    /// Open the migrated database through the library.
    pub fn pool(&self) -> DbPool {
        let pool = DbPool::new(&self.db).expect("open db");
        init_db(&pool.conn).expect("init db");
        pool
    }
}

pub fn add_year(pool: &mut DbPool, name: &str, start: i32, active: bool) -> AcademicYear {
    let input = NewAcademicYear {
        name: name.to_string(),
        start_year: start,
        end_year: start + 1,
        status: Some(if active {
            YearStatus::Active
        } else {
            YearStatus::Inactive
        }),
    };
    academic_year::create(&mut pool.conn, input).expect("create year")
}

pub fn add_student(pool: &mut DbPool, name: &str, class: &str, year: Option<i64>) -> Student {
    let input = NewStudent {
        name: name.to_string(),
        class: class.to_string(),
        parent_phone: "677123456".to_string(),
        photo: None,
        academic_year_id: year,
    };
    registry::create_student(&mut pool.conn, PREFIX, input).expect("create student")
}

pub fn add_teacher(pool: &mut DbPool, name: &str) -> Teacher {
    let input = NewTeacher {
        name: name.to_string(),
        id_card_number: "CM-0042".to_string(),
        phone: "+237 699 000 111".to_string(),
        sex: "F".to_string(),
        photo: None,
    };
    registry::create_teacher(&mut pool.conn, PREFIX, input).expect("create teacher")
}

/// Init the DB through the CLI and register an active 2025-2026 year with
/// three students: MPASAT2501 Alice, MPASAT2502 Bob, MPASAT2503 Carol.
pub fn init_school(env: &TestEnv) {
    env.init();

    env.cmd()
        .args(["year", "--add", "2025-2026", "--start", "2025", "--end", "2026"])
        .assert()
        .success();
    env.cmd().args(["year", "--activate", "1"]).assert().success();

    for (name, class) in [("Alice", "Form 1"), ("Bob", "Form 1"), ("Carol", "Form 2")] {
        env.cmd()
            .args(["student", "--add", name, "--class", class, "--phone", "677123456"])
            .assert()
            .success();
    }
}
