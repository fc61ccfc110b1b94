use crate::errors::AppResult;
use crate::models::school_class::SchoolClass;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_class(row: &Row) -> rusqlite::Result<SchoolClass> {
    Ok(SchoolClass {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn list_classes(conn: &Connection) -> AppResult<Vec<SchoolClass>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, code, created_at FROM classes ORDER BY name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map([], map_class)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_class(conn: &Connection, id: i64) -> AppResult<Option<SchoolClass>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, name, code, created_at FROM classes WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_class).optional()?)
}

pub fn insert_class(conn: &Connection, c: &SchoolClass) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO classes (name, code, created_at) VALUES (?1, ?2, ?3)",
        params![c.name, c.code, c.created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_class(conn: &Connection, c: &SchoolClass) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE classes SET name = ?1, code = ?2 WHERE id = ?3",
        params![c.name, c.code, c.id],
    )?)
}

pub fn delete_class(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM classes WHERE id = ?1", [id])?)
}
