//! Aggregator/reporter. Reads only; never mutates the store.

use crate::db::{attendance, people};
use crate::errors::AppResult;
use crate::models::academic_year::YearScope;
use crate::models::event::AttendanceEvent;
use crate::models::person::{Student, Teacher};
use crate::models::person_kind::PersonKind;
use crate::models::report::{AbsentStudent, DayReport, DayStats, EntryRow, ReportEntry};
use crate::models::status::AttendanceStatus;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};

/// Build the day report from the roster in scope, all teachers and the
/// day's events (already restricted to the scope).
///
/// Only students count toward present/late/absent. Teachers appear in the
/// entries and in `teachers_checked_in`.
pub fn build_day_report(
    date: NaiveDate,
    roster: &[Student],
    teachers: &[Teacher],
    events: &[AttendanceEvent],
) -> DayReport {
    let students: HashMap<i64, &Student> = roster.iter().map(|s| (s.id, s)).collect();
    let staff: HashMap<i64, &Teacher> = teachers.iter().map(|t| (t.id, t)).collect();

    let mut entries: Vec<ReportEntry> = Vec::new();
    let mut index: HashMap<(PersonKind, i64), usize> = HashMap::new();

    for ev in events.iter().filter(|e| e.date == date) {
        let key = (ev.person_type, ev.person_id);

        let pos = match index.get(&key) {
            Some(&i) => i,
            None => {
                let entry = match ev.person_type {
                    PersonKind::Student => match students.get(&ev.person_id) {
                        Some(s) => ReportEntry {
                            person_type: PersonKind::Student,
                            person_id: s.id,
                            student_id: Some(s.student_id.clone()),
                            teacher_id: None,
                            name: s.name.clone(),
                            class: Some(s.class.clone()),
                            arrival: None,
                            departure: None,
                            status: None,
                            minutes_late: None,
                        },
                        None => continue,
                    },
                    PersonKind::Teacher => match staff.get(&ev.person_id) {
                        Some(t) => ReportEntry {
                            person_type: PersonKind::Teacher,
                            person_id: t.id,
                            student_id: None,
                            teacher_id: Some(t.teacher_id.clone()),
                            name: t.name.clone(),
                            class: None,
                            arrival: None,
                            departure: None,
                            status: None,
                            minutes_late: None,
                        },
                        None => continue,
                    },
                };
                entries.push(entry);
                index.insert(key, entries.len() - 1);
                entries.len() - 1
            }
        };

        let entry = &mut entries[pos];
        if ev.check_in_type.is_arrival() {
            entry.arrival = Some(ev.time);
            entry.status = ev.status;
            entry.minutes_late = ev.minutes_late;
        } else {
            entry.departure = Some(ev.time);
        }
    }

    let mut stats = DayStats {
        total_roster: roster.len() as i64,
        ..DayStats::default()
    };
    let mut arrived: HashSet<i64> = HashSet::new();

    for e in entries.iter().filter(|e| e.arrival.is_some()) {
        match e.person_type {
            // An arrival without a status is not counted as attendance.
            PersonKind::Student => match e.status {
                Some(AttendanceStatus::Present) => {
                    arrived.insert(e.person_id);
                    stats.present += 1;
                }
                Some(AttendanceStatus::Late) => {
                    arrived.insert(e.person_id);
                    stats.late += 1;
                }
                None => {}
            },
            PersonKind::Teacher => stats.teachers_checked_in += 1,
        }
    }

    let mut absent_students: Vec<AbsentStudent> = roster
        .iter()
        .filter(|s| !arrived.contains(&s.id))
        .map(|s| AbsentStudent {
            id: s.id,
            student_id: s.student_id.clone(),
            name: s.name.clone(),
            class: s.class.clone(),
        })
        .collect();
    absent_students.sort_by(|a, b| {
        a.class
            .to_lowercase()
            .cmp(&b.class.to_lowercase())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    stats.absent = absent_students.len() as i64;
    stats.total_checked_in = stats.present + stats.late;

    DayReport {
        date,
        stats,
        entries,
        absent_students,
    }
}

/// Load roster and events for `date` in `scope` and build the report.
pub fn day_report(conn: &Connection, date: NaiveDate, scope: YearScope) -> AppResult<DayReport> {
    let roster = people::list_students(conn, scope)?;
    let teachers = people::list_teachers(conn)?;
    let events = attendance::events_on(conn, date, scope)?;

    Ok(build_day_report(date, &roster, &teachers, &events))
}

pub fn day_stats(conn: &Connection, date: NaiveDate, scope: YearScope) -> AppResult<DayStats> {
    Ok(day_report(conn, date, scope)?.stats)
}

/// Event listing for the date, newest first.
pub fn day_entries(conn: &Connection, date: NaiveDate, scope: YearScope) -> AppResult<Vec<EntryRow>> {
    attendance::entry_rows_on(conn, date, scope)
}
