use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, params};

const INSERT_AUDIT: &str = "INSERT INTO log (date, operation, target, message) VALUES (?1, ?2, ?3, ?4)";

/// Append an audit row. Runs on whatever connection or transaction the
/// caller holds, so the row commits together with the change it describes.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    conn.prepare_cached(INSERT_AUDIT)?
        .execute(params![Local::now().to_rfc3339(), operation, target, message])?;
    Ok(())
}
