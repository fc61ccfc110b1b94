// src/export/model.rs

use crate::models::report::DayReport;
use crate::utils::time::format_time;
use serde::Serialize;

/// Flat report row shared by every export format.
/// Registered students without an arrival are exported with status `absent`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ReportExport {
    pub date: String,
    pub person_type: String,
    pub code: String,
    pub name: String,
    pub class: String,
    pub arrival: String,
    pub departure: String,
    pub status: String,
    pub minutes_late: i64,
}

/// Headers for CSV / XLSX / PDF
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "date",
        "person_type",
        "code",
        "name",
        "class",
        "arrival",
        "departure",
        "status",
        "minutes_late",
    ]
}

pub(crate) fn row_to_cells(r: &ReportExport) -> Vec<String> {
    vec![
        r.date.clone(),
        r.person_type.clone(),
        r.code.clone(),
        r.name.clone(),
        r.class.clone(),
        r.arrival.clone(),
        r.departure.clone(),
        r.status.clone(),
        r.minutes_late.to_string(),
    ]
}

pub(crate) fn rows_to_table(rows: &[ReportExport]) -> Vec<Vec<String>> {
    rows.iter().map(row_to_cells).collect()
}

pub fn rows_from_report(report: &DayReport) -> Vec<ReportExport> {
    let date = report.date.format("%Y-%m-%d").to_string();

    let mut out: Vec<ReportExport> = report
        .entries
        .iter()
        .map(|e| ReportExport {
            date: date.clone(),
            person_type: e.person_type.to_db_str().to_string(),
            code: e.code().to_string(),
            name: e.name.clone(),
            class: e.class.clone().unwrap_or_default(),
            arrival: e.arrival.map(format_time).unwrap_or_default(),
            departure: e.departure.map(format_time).unwrap_or_default(),
            status: e
                .status
                .map(|s| s.to_db_str().to_string())
                .unwrap_or_default(),
            minutes_late: e.minutes_late.unwrap_or(0),
        })
        .collect();

    out.extend(report.absent_students.iter().map(|a| ReportExport {
        date: date.clone(),
        person_type: "student".to_string(),
        code: a.student_id.clone(),
        name: a.name.clone(),
        class: a.class.clone(),
        arrival: String::new(),
        departure: String::new(),
        status: "absent".to_string(),
        minutes_late: 0,
    }));

    out
}
