use super::conversion_err;
use crate::errors::AppResult;
use crate::models::settings::SchoolTimes;
use chrono::{Local, NaiveTime};
use rusqlite::{Connection, OptionalExtension, params};

fn parse_stored(idx: usize, raw: &str) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| conversion_err(idx, format!("bad stored time '{raw}'")))
}

/// Read the singleton row. A missing row yields the seeded defaults.
pub fn load_times(conn: &Connection) -> AppResult<SchoolTimes> {
    let mut stmt = conn.prepare_cached(
        "SELECT school_start_time, school_end_time FROM settings WHERE id = 1",
    )?;

    let row = stmt
        .query_row([], |r| {
            let start: String = r.get(0)?;
            let end: String = r.get(1)?;
            Ok(SchoolTimes {
                school_start_time: parse_stored(0, &start)?,
                school_end_time: parse_stored(1, &end)?,
            })
        })
        .optional()?;

    Ok(row.unwrap_or_default())
}

pub fn store_times(conn: &Connection, times: &SchoolTimes) -> AppResult<()> {
    conn.execute(
        "INSERT INTO settings (id, school_start_time, school_end_time, updated_at)
         VALUES (1, ?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
            school_start_time = excluded.school_start_time,
            school_end_time = excluded.school_end_time,
            updated_at = excluded.updated_at",
        params![
            times.school_start_time.format("%H:%M").to_string(),
            times.school_end_time.format("%H:%M").to_string(),
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(())
}
