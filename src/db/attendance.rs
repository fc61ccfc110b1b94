//! Attendance store: the durable per-day, per-person event log.

use super::conversion_err;
use crate::errors::AppResult;
use crate::models::academic_year::YearScope;
use crate::models::check_in_type::CheckInType;
use crate::models::event::{AttendanceEvent, NewEvent};
use crate::models::person_kind::PersonKind;
use crate::models::report::EntryRow;
use crate::models::status::AttendanceStatus;
use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::{Connection, Row, params};

const EVENT_COLS: &str = "a.id, a.person_type, a.person_id, a.date, a.check_in_type, \
     a.check_in_time, a.status, a.minutes_late, a.source, a.created_at";

/// Students of other years are filtered out; teachers are never year-scoped.
const SCOPE_FILTER: &str = "(?2 IS NULL OR a.person_type = 'teacher' OR s.academic_year_id = ?2)";

fn parse_kind(idx: usize, raw: &str) -> rusqlite::Result<PersonKind> {
    PersonKind::from_db_str(raw).ok_or_else(|| conversion_err(idx, format!("person_type '{raw}'")))
}

fn parse_check_in_type(idx: usize, raw: &str) -> rusqlite::Result<CheckInType> {
    CheckInType::from_db_str(raw)
        .ok_or_else(|| conversion_err(idx, format!("check_in_type '{raw}'")))
}

fn parse_status(idx: usize, raw: Option<String>) -> rusqlite::Result<Option<AttendanceStatus>> {
    match raw {
        None => Ok(None),
        Some(s) => AttendanceStatus::from_db_str(&s)
            .map(Some)
            .ok_or_else(|| conversion_err(idx, format!("status '{s}'"))),
    }
}

fn parse_date(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| conversion_err(idx, format!("date '{raw}'")))
}

fn parse_time(idx: usize, raw: &str) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .map_err(|_| conversion_err(idx, format!("time '{raw}'")))
}

fn map_event(row: &Row) -> rusqlite::Result<AttendanceEvent> {
    let kind: String = row.get(1)?;
    let date: String = row.get(3)?;
    let cit: String = row.get(4)?;
    let time: String = row.get(5)?;

    Ok(AttendanceEvent {
        id: row.get(0)?,
        person_type: parse_kind(1, &kind)?,
        person_id: row.get(2)?,
        date: parse_date(3, &date)?,
        check_in_type: parse_check_in_type(4, &cit)?,
        time: parse_time(5, &time)?,
        status: parse_status(6, row.get(6)?)?,
        minutes_late: row.get(7)?,
        source: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn date_str(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Insert one event. A second arrival/departure for the same person and day
/// fails with a UNIQUE constraint violation.
pub fn insert_event(conn: &Connection, ev: &NewEvent) -> AppResult<AttendanceEvent> {
    let created_at = Local::now().to_rfc3339();

    conn.execute(
        "INSERT INTO attendance
            (person_type, person_id, date, check_in_type, check_in_time,
             status, minutes_late, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            ev.person_type.to_db_str(),
            ev.person_id,
            date_str(ev.date),
            ev.check_in_type.to_db_str(),
            ev.time.format("%H:%M:%S").to_string(),
            ev.status.map(|s| s.to_db_str()),
            ev.minutes_late,
            ev.source,
            created_at
        ],
    )?;

    Ok(AttendanceEvent {
        id: conn.last_insert_rowid(),
        person_type: ev.person_type,
        person_id: ev.person_id,
        date: ev.date,
        check_in_type: ev.check_in_type,
        time: ev.time,
        status: ev.status,
        minutes_late: ev.minutes_late,
        source: ev.source.clone(),
        created_at,
    })
}

/// Events of one person on one day, arrival first.
pub fn events_for_person_on(
    conn: &Connection,
    kind: PersonKind,
    person_id: i64,
    date: NaiveDate,
) -> AppResult<Vec<AttendanceEvent>> {
    let sql = format!(
        "SELECT {EVENT_COLS} FROM attendance a
         WHERE a.person_type = ?1 AND a.person_id = ?2 AND a.date = ?3
         ORDER BY CASE a.check_in_type WHEN 'arrival' THEN 0 ELSE 1 END, a.id"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(
        params![kind.to_db_str(), person_id, date_str(date)],
        map_event,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Events on a date, optionally restricted to one academic year.
pub fn events_on(
    conn: &Connection,
    date: NaiveDate,
    scope: YearScope,
) -> AppResult<Vec<AttendanceEvent>> {
    let sql = format!(
        "SELECT {EVENT_COLS} FROM attendance a
         LEFT JOIN students s ON a.person_type = 'student' AND s.id = a.person_id
         WHERE a.date = ?1 AND {SCOPE_FILTER}
         ORDER BY a.check_in_time, a.id"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![date_str(date), scope.year_id()], map_event)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Events on a date joined with the person they belong to, newest first.
pub fn entry_rows_on(conn: &Connection, date: NaiveDate, scope: YearScope) -> AppResult<Vec<EntryRow>> {
    let sql = format!(
        "SELECT a.id, a.person_id, a.person_type, s.student_id, t.teacher_id,
                COALESCE(s.name, t.name, ''), s.class,
                a.check_in_type, a.check_in_time, a.status, a.minutes_late
           FROM attendance a
           LEFT JOIN students s ON a.person_type = 'student' AND s.id = a.person_id
           LEFT JOIN teachers t ON a.person_type = 'teacher' AND t.id = a.person_id
          WHERE a.date = ?1 AND {SCOPE_FILTER}
          ORDER BY a.check_in_time DESC, a.id DESC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![date_str(date), scope.year_id()], |row| {
        let kind: String = row.get(2)?;
        let cit: String = row.get(7)?;
        let time: String = row.get(8)?;
        Ok(EntryRow {
            id: row.get(0)?,
            person_id: row.get(1)?,
            person_type: parse_kind(2, &kind)?,
            student_id: row.get(3)?,
            teacher_id: row.get(4)?,
            name: row.get(5)?,
            class: row.get(6)?,
            check_in_type: parse_check_in_type(7, &cit)?,
            check_in_time: parse_time(8, &time)?,
            status: parse_status(9, row.get(9)?)?,
            minutes_late: row.get(10)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Bulk delete. With a year scope only events of that year's students go.
pub fn delete_all(conn: &Connection, scope: YearScope) -> AppResult<usize> {
    let n = match scope {
        YearScope::All => conn.execute("DELETE FROM attendance", [])?,
        YearScope::Year(id) => conn.execute(
            "DELETE FROM attendance
              WHERE person_type = 'student'
                AND person_id IN (SELECT id FROM students WHERE academic_year_id = ?1)",
            [id],
        )?,
    };
    Ok(n)
}

pub fn delete_for_person(conn: &Connection, kind: PersonKind, person_id: i64) -> AppResult<usize> {
    Ok(conn.execute(
        "DELETE FROM attendance WHERE person_type = ?1 AND person_id = ?2",
        params![kind.to_db_str(), person_id],
    )?)
}

/// Distinct dates with at least one event, within `[from, to]`.
pub fn dates_with_events(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<NaiveDate>> {
    let mut stmt = conn.prepare_cached(
        "SELECT DISTINCT date FROM attendance WHERE date BETWEEN ?1 AND ?2 ORDER BY date",
    )?;
    let rows = stmt.query_map(params![date_str(from), date_str(to)], |r| {
        let raw: String = r.get(0)?;
        parse_date(0, &raw)
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
