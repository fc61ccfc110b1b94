use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

/// One schema step. Applied steps are recorded in the `log` table as
/// `migration_applied` rows whose target is the version string.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260901_0001_create_registry",
        description: "Created academic_years, classes, students and teachers tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS academic_years (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            start_year  INTEGER NOT NULL,
            end_year    INTEGER NOT NULL,
            status      TEXT NOT NULL DEFAULT 'inactive' CHECK(status IN ('active','inactive')),
            created_at  TEXT NOT NULL,
            CHECK (start_year < end_year)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_academic_years_one_active
            ON academic_years(status) WHERE status = 'active';

        CREATE TABLE IF NOT EXISTS classes (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            code        TEXT NOT NULL UNIQUE,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS students (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id        TEXT NOT NULL UNIQUE,
            name              TEXT NOT NULL,
            class             TEXT NOT NULL,
            parent_phone      TEXT NOT NULL,
            photo             TEXT,
            academic_year_id  INTEGER REFERENCES academic_years(id),
            created_at        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_students_year ON students(academic_year_id);

        CREATE TABLE IF NOT EXISTS teachers (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            teacher_id      TEXT NOT NULL UNIQUE,
            name            TEXT NOT NULL,
            id_card_number  TEXT NOT NULL,
            phone           TEXT NOT NULL,
            sex             TEXT NOT NULL,
            photo           TEXT,
            created_at      TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20260901_0002_create_attendance",
        description: "Created attendance table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            person_type    TEXT NOT NULL CHECK(person_type IN ('student','teacher')),
            person_id      INTEGER NOT NULL,
            date           TEXT NOT NULL,
            check_in_type  TEXT NOT NULL CHECK(check_in_type IN ('arrival','departure')),
            check_in_time  TEXT NOT NULL,
            status         TEXT CHECK(status IS NULL OR status IN ('present','late')),
            minutes_late   INTEGER CHECK(minutes_late IS NULL OR minutes_late >= 0),
            source         TEXT NOT NULL DEFAULT 'api',
            created_at     TEXT NOT NULL,
            UNIQUE (person_type, person_id, date, check_in_type)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_date_type ON attendance(date, check_in_type);
        "#,
    },
    Migration {
        version: "20260901_0003_create_settings",
        description: "Created settings table with default school times",
        sql: r#"
        CREATE TABLE IF NOT EXISTS settings (
            id                 INTEGER PRIMARY KEY CHECK (id = 1),
            school_start_time  TEXT NOT NULL,
            school_end_time    TEXT NOT NULL,
            updated_at         TEXT
        );

        INSERT OR IGNORE INTO settings (id, school_start_time, school_end_time)
        VALUES (1, '08:00', '15:00');
        "#,
    },
];

/// Ensure that the `log` table exists. Migrations are tracked there.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> AppResult<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    // execute_batch inside an explicit transaction so a failing step leaves no trace
    let script = format!(
        "BEGIN;\n{}\nINSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', '{}', '{}');\nCOMMIT;",
        m.sql, m.version, m.description
    );

    if let Err(e) = conn.execute_batch(&script) {
        let _ = conn.execute_batch("ROLLBACK;");
        return Err(AppError::Migration(format!("{}: {}", m.version, e)));
    }

    success(format!("Migration applied: {} → {}", m.version, m.description));
    Ok(())
}

/// Versions not yet recorded as applied, in order.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations in order.
///
/// Called by `db::initialize::init_db()`.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        applied += 1;
    }

    Ok(applied)
}
