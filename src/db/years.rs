//! Academic year rows.

use super::conversion_err;
use crate::errors::AppResult;
use crate::models::academic_year::{AcademicYear, YearStatus};
use rusqlite::{Connection, OptionalExtension, Row, params};

const YEAR_COLS: &str = "id, name, start_year, end_year, status, created_at";

fn map_year(row: &Row) -> rusqlite::Result<AcademicYear> {
    let status: String = row.get(4)?;
    Ok(AcademicYear {
        id: row.get(0)?,
        name: row.get(1)?,
        start_year: row.get(2)?,
        end_year: row.get(3)?,
        status: YearStatus::from_db_str(&status)
            .ok_or_else(|| conversion_err(4, format!("unknown year status '{status}'")))?,
        created_at: row.get(5)?,
    })
}

/// All years, newest first.
pub fn list_years(conn: &Connection) -> AppResult<Vec<AcademicYear>> {
    let sql = format!("SELECT {YEAR_COLS} FROM academic_years ORDER BY start_year DESC, id DESC");
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([], map_year)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_year(conn: &Connection, id: i64) -> AppResult<Option<AcademicYear>> {
    let sql = format!("SELECT {YEAR_COLS} FROM academic_years WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_year).optional()?)
}

pub fn active_year(conn: &Connection) -> AppResult<Option<AcademicYear>> {
    let sql = format!("SELECT {YEAR_COLS} FROM academic_years WHERE status = 'active' LIMIT 1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([], map_year).optional()?)
}

pub fn insert_year(conn: &Connection, y: &AcademicYear) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO academic_years (name, start_year, end_year, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            y.name,
            y.start_year,
            y.end_year,
            y.status.to_db_str(),
            y.created_at
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_year(conn: &Connection, y: &AcademicYear) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE academic_years
            SET name = ?1, start_year = ?2, end_year = ?3, status = ?4
          WHERE id = ?5",
        params![y.name, y.start_year, y.end_year, y.status.to_db_str(), y.id],
    )?)
}

/// Mark every year except `keep` inactive.
pub fn demote_others(conn: &Connection, keep: i64) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE academic_years SET status = 'inactive' WHERE status = 'active' AND id <> ?1",
        [keep],
    )?)
}

pub fn delete_year(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM academic_years WHERE id = ?1", [id])?)
}
