use super::{
    check_in_type::CheckInType, person_kind::PersonKind, status::AttendanceStatus,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Which quantity the single `total` field reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalBasis {
    /// Students registered in scope.
    #[default]
    Roster,
    /// Students with an arrival on the date.
    CheckedIn,
}

impl TotalBasis {
    pub fn from_str_opt(s: Option<&str>) -> Option<Self> {
        match s.map(str::trim) {
            None | Some("") | Some("roster") => Some(TotalBasis::Roster),
            Some("checked_in") => Some(TotalBasis::CheckedIn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub total_checked_in: i64,
    pub total_roster: i64,
    pub teachers_checked_in: i64,
}

impl DayStats {
    pub fn total(&self, basis: TotalBasis) -> i64 {
        match basis {
            TotalBasis::Roster => self.total_roster,
            TotalBasis::CheckedIn => self.total_checked_in,
        }
    }
}

/// One report row per person with at least one event on the date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub person_type: PersonKind,
    pub person_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    pub name: String,
    pub class: Option<String>,
    pub arrival: Option<NaiveTime>,
    pub departure: Option<NaiveTime>,
    pub status: Option<AttendanceStatus>,
    pub minutes_late: Option<i64>,
}

impl ReportEntry {
    pub fn code(&self) -> &str {
        self.student_id
            .as_deref()
            .or(self.teacher_id.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbsentStudent {
    pub id: i64,
    pub student_id: String,
    pub name: String,
    pub class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub stats: DayStats,
    pub entries: Vec<ReportEntry>,
    #[serde(rename = "absentStudents")]
    pub absent_students: Vec<AbsentStudent>,
}

/// One attendance event joined with its person, as listed by the entries endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub id: i64,
    pub person_id: i64,
    pub person_type: PersonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    pub name: String,
    pub class: Option<String>,
    pub check_in_type: CheckInType,
    pub check_in_time: NaiveTime,
    pub status: Option<AttendanceStatus>,
    pub minutes_late: Option<i64>,
}

impl EntryRow {
    pub fn code(&self) -> &str {
        self.student_id
            .as_deref()
            .or(self.teacher_id.as_deref())
            .unwrap_or("")
    }
}
