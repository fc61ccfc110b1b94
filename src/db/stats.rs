use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::{Connection, OptionalExtension};
use std::fs;

/// Row counts and event date range of a database.
#[derive(Debug, Clone, Default)]
pub struct DbInfo {
    pub students: i64,
    pub teachers: i64,
    pub academic_years: i64,
    pub classes: i64,
    pub events: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

fn count(conn: &Connection, table: &str) -> AppResult<i64> {
    Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
}

pub fn collect_db_info(conn: &Connection) -> AppResult<DbInfo> {
    let first_date: Option<String> = conn
        .query_row("SELECT MIN(date) FROM attendance", [], |r| r.get(0))
        .optional()?
        .flatten();
    let last_date: Option<String> = conn
        .query_row("SELECT MAX(date) FROM attendance", [], |r| r.get(0))
        .optional()?
        .flatten();

    Ok(DbInfo {
        students: count(conn, "students")?,
        teachers: count(conn, "teachers")?,
        academic_years: count(conn, "academic_years")?,
        classes: count(conn, "classes")?,
        events: count(conn, "attendance")?,
        first_date,
        last_date,
    })
}

/// Cheap liveness probe used by the health endpoint.
pub fn ping(conn: &Connection) -> bool {
    conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0)).is_ok()
}

pub fn print_db_info(conn: &Connection, db_path: &str) -> AppResult<()> {
    let info = collect_db_info(conn)?;
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    println!("{}• Students:{} {}", CYAN, RESET, info.students);
    println!("{}• Teachers:{} {}", CYAN, RESET, info.teachers);
    println!("{}• Academic years:{} {}", CYAN, RESET, info.academic_years);
    println!("{}• Classes:{} {}", CYAN, RESET, info.classes);
    println!(
        "{}• Attendance events:{} {}{}{}",
        CYAN, RESET, GREEN, info.events, RESET
    );

    let dash = || format!("{GREY}--{RESET}");
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", info.first_date.clone().unwrap_or_else(dash));
    println!("    to:   {}", info.last_date.clone().unwrap_or_else(dash));

    println!();
    Ok(())
}
