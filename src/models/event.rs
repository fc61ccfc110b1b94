use super::{check_in_type::CheckInType, person_kind::PersonKind, status::AttendanceStatus};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// One row of the `attendance` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceEvent {
    pub id: i64,
    pub person_type: PersonKind, // ⇔ attendance.person_type ('student' | 'teacher')
    pub person_id: i64,
    pub date: NaiveDate, // ⇔ attendance.date (TEXT "YYYY-MM-DD")
    pub check_in_type: CheckInType,
    #[serde(rename = "check_in_time")]
    pub time: NaiveTime, // ⇔ attendance.check_in_time (TEXT "HH:MM:SS")
    pub status: Option<AttendanceStatus>, // arrivals only
    pub minutes_late: Option<i64>,        // arrivals only
    pub source: String,
    pub created_at: String,
}

impl AttendanceEvent {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format("%H:%M:%S").to_string()
    }

    pub fn is_arrival(&self) -> bool {
        self.check_in_type.is_arrival()
    }
}

/// An event about to be stored; id and created_at are assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub person_type: PersonKind,
    pub person_id: i64,
    pub date: NaiveDate,
    pub check_in_type: CheckInType,
    pub time: NaiveTime,
    pub status: Option<AttendanceStatus>,
    pub minutes_late: Option<i64>,
    pub source: String,
}
