//! Daily session tracker.
//!
//! Per person and calendar day the state only moves forward:
//! `NoEvent -> Arrived -> Departed`. The read of the current state and the
//! insert of the next event run inside one IMMEDIATE transaction, and the
//! `attendance` table's UNIQUE constraint catches any writer that slipped past.

use crate::config::ClockSource;
use crate::core::calculator::classify::classify;
use crate::core::resolver::resolve;
use crate::db::{attendance, log::ttlog, settings};
use crate::errors::{AppError, AppResult, is_unique_violation};
use crate::models::check_in_type::CheckInType;
use crate::models::event::{AttendanceEvent, NewEvent};
use crate::models::person::Person;
use crate::utils::{date::today, time::now_time};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    NoEvent,
    Arrived { at: NaiveTime },
    Departed,
}

impl DayState {
    pub fn from_events(events: &[AttendanceEvent]) -> Self {
        let arrival = events.iter().find(|e| e.check_in_type.is_arrival());
        let departed = events.iter().any(|e| e.check_in_type.is_departure());

        match (arrival, departed) {
            (_, true) => DayState::Departed,
            (Some(a), false) => DayState::Arrived { at: a.time },
            (None, false) => DayState::NoEvent,
        }
    }

    /// The event a new scan would create, if any.
    pub fn next(&self) -> Option<CheckInType> {
        match self {
            DayState::NoEvent => Some(CheckInType::Arrival),
            DayState::Arrived { .. } => Some(CheckInType::Departure),
            DayState::Departed => None,
        }
    }
}

/// Tracker knobs taken from the configuration.
#[derive(Debug, Clone, Copy)]
pub struct TrackerOptions {
    pub clock: ClockSource,
    pub duplicate_window_secs: i64,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            clock: ClockSource::Client,
            duplicate_window_secs: 60,
        }
    }
}

/// Result of a successful scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub person: Person,
    pub event: AttendanceEvent,
    /// The person's events that day; the last one is `event`.
    pub day_events: Vec<AttendanceEvent>,
}

/// Pick the calendar date and time of a scan.
pub fn effective_clock(
    clock: ClockSource,
    client_date: Option<NaiveDate>,
    client_time: Option<NaiveTime>,
) -> (NaiveDate, NaiveTime) {
    match clock {
        ClockSource::Server => (today(), now_time()),
        ClockSource::Client => (
            client_date.unwrap_or_else(today),
            client_time.unwrap_or_else(now_time),
        ),
    }
}

/// Record the next event for `person` on `date`.
///
/// The caller must hold a write transaction on `conn`.
pub fn record_scan(
    conn: &Connection,
    person: &Person,
    date: NaiveDate,
    time: NaiveTime,
    duplicate_window_secs: i64,
    source: &str,
) -> AppResult<AttendanceEvent> {
    let existing = attendance::events_for_person_on(conn, person.kind(), person.id(), date)?;
    let state = DayState::from_events(&existing);

    let new_event = match state {
        DayState::NoEvent => {
            let times = settings::load_times(conn)?;
            let c = classify(time, times.school_start_time);
            NewEvent {
                person_type: person.kind(),
                person_id: person.id(),
                date,
                check_in_type: CheckInType::Arrival,
                time,
                status: Some(c.status),
                minutes_late: Some(c.minutes_late),
                source: source.to_string(),
            }
        }
        DayState::Arrived { at } => {
            if time < at {
                return Err(AppError::Rejected(format!(
                    "Departure time {} is earlier than arrival {}",
                    time.format("%H:%M:%S"),
                    at.format("%H:%M:%S")
                )));
            }
            if (time - at).num_seconds() < duplicate_window_secs {
                return Err(AppError::Rejected(
                    "Duplicate scan ignored, arrival was just recorded".into(),
                ));
            }
            NewEvent {
                person_type: person.kind(),
                person_id: person.id(),
                date,
                check_in_type: CheckInType::Departure,
                time,
                status: None,
                minutes_late: None,
                source: source.to_string(),
            }
        }
        DayState::Departed => {
            return Err(AppError::Rejected(format!(
                "{} already scanned twice today",
                person.name()
            )));
        }
    };

    attendance::insert_event(conn, &new_event).map_err(|e| match e {
        AppError::Db(ref db) if is_unique_violation(db) => AppError::Rejected(format!(
            "{} was already recorded by a concurrent scan",
            new_event.check_in_type.label()
        )),
        other => other,
    })
}

/// Full check-in: resolve the code, pick the clock and record the event,
/// all inside one IMMEDIATE transaction.
pub fn check_in(
    conn: &mut Connection,
    code: &str,
    client_date: Option<NaiveDate>,
    client_time: Option<NaiveTime>,
    opts: TrackerOptions,
    source: &str,
) -> AppResult<ScanOutcome> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let person = resolve(&tx, code)?;
    let (date, time) = effective_clock(opts.clock, client_date, client_time);
    debug!(code = person.code(), %date, %time, "recording scan");

    let event = record_scan(&tx, &person, date, time, opts.duplicate_window_secs, source)?;
    let day_events = attendance::events_for_person_on(&tx, person.kind(), person.id(), date)?;

    ttlog(
        &tx,
        "checkin",
        person.code(),
        &format!(
            "{} {} {} at {}",
            person.name(),
            event.check_in_type.to_db_str(),
            event.date_str(),
            event.time_str()
        ),
    )?;

    tx.commit()?;

    info!(
        code = person.code(),
        kind = person.kind().to_db_str(),
        check_in_type = event.check_in_type.to_db_str(),
        "check-in recorded"
    );

    Ok(ScanOutcome {
        person,
        event,
        day_events,
    })
}
