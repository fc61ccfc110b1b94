use crate::db::{log::ttlog, settings};
use crate::errors::{AppError, AppResult};
use crate::models::settings::SchoolTimes;
use crate::utils::time::parse_hhmm;
use rusqlite::Connection;

pub fn get(conn: &Connection) -> AppResult<SchoolTimes> {
    settings::load_times(conn)
}

/// Validate and store new school times. On any error the stored values stay.
/// Only future arrivals are classified with the new start time.
pub fn set(conn: &mut Connection, start: &str, end: &str) -> AppResult<SchoolTimes> {
    let times = SchoolTimes {
        school_start_time: parse_hhmm(start)?,
        school_end_time: parse_hhmm(end)?,
    };

    if times.school_start_time >= times.school_end_time {
        return Err(AppError::Rejected(format!(
            "School start time {start} must be before end time {end}"
        )));
    }

    let tx = conn.transaction()?;
    settings::store_times(&tx, &times)?;
    ttlog(
        &tx,
        "settings",
        "school_times",
        &format!("School times set to {start} - {end}"),
    )?;
    tx.commit()?;

    Ok(times)
}
