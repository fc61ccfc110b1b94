use crate::db::{attendance, log::ttlog};
use crate::errors::AppResult;
use crate::models::academic_year::YearScope;
use rusqlite::Connection;
use tracing::warn;

/// Bulk delete of attendance events. Not reversible.
pub fn purge(conn: &mut Connection, scope: YearScope) -> AppResult<usize> {
    let tx = conn.transaction()?;
    let deleted = attendance::delete_all(&tx, scope)?;

    let target = match scope {
        YearScope::All => "all".to_string(),
        YearScope::Year(id) => format!("academic_year:{id}"),
    };
    ttlog(
        &tx,
        "purge",
        &target,
        &format!("Deleted {deleted} attendance events"),
    )?;
    tx.commit()?;

    warn!(deleted, scope = %target, "attendance events purged");
    Ok(deleted)
}
