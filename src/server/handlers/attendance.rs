//! `/api/attendance/*`: check-in, dashboard stats, entry log, day report,
//! report download and bulk delete.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::core::{academic_year::resolve_scope, aggregate, purge, tracker};
use crate::errors::{AppError, AppResult};
use crate::export::{ExportFormat, ExportLogic};
use crate::models::academic_year::YearScope;
use crate::models::check_in_type::CheckInType;
use crate::models::event::AttendanceEvent;
use crate::models::person::Person;
use crate::models::person_kind::PersonKind;
use crate::models::report::{AbsentStudent, DayStats, EntryRow, ReportEntry, TotalBasis};
use crate::models::status::AttendanceStatus;
use crate::server::extract::ApiJson;
use crate::server::response::ok;
use crate::server::state::AppState;
use crate::utils::date::{parse_date, parse_date_or_today};
use crate::utils::time::parse_scan_time;

// ---------------------------
// Query parameters
// ---------------------------

/// Query string shared by the read endpoints. Everything is optional and
/// kept as text so that bad values surface as `400` envelopes.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub date: Option<String>,
    pub academic_year_id: Option<String>,
    pub total: Option<String>,
    pub format: Option<String>,
}

impl ReportQuery {
    fn date(&self) -> AppResult<NaiveDate> {
        parse_date_or_today(self.date.as_deref())
    }

    fn total_basis(&self) -> AppResult<TotalBasis> {
        TotalBasis::from_str_opt(self.total.as_deref()).ok_or_else(|| {
            AppError::Validation(format!(
                "Invalid total: {} (expected roster or checked_in)",
                self.total.as_deref().unwrap_or_default()
            ))
        })
    }
}

fn scope_id(scope: YearScope) -> Option<i64> {
    scope.year_id()
}

// ---------------------------
// Check-in
// ---------------------------

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    #[serde(default)]
    pub qr_data: String,
    pub client_date: Option<String>,
    pub client_time: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckinResponse {
    pub message: String,
    pub person_type: PersonKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    pub name: String,
    pub class: Option<String>,
    pub date: NaiveDate,
    pub check_in_type: CheckInType,
    pub check_in_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_late: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Vec<DayEventView>>,
}

/// A day event as the scanner shows it: the stored row plus who it belongs to.
#[derive(Debug, Serialize)]
pub struct DayEventView {
    #[serde(flatten)]
    pub event: AttendanceEvent,
    pub student_id: String,
    pub name: String,
    pub class: String,
}

impl From<tracker::ScanOutcome> for CheckinResponse {
    fn from(out: tracker::ScanOutcome) -> Self {
        let ev = out.event;
        let message = format!("{} recorded for {}", ev.check_in_type.label(), out.person.name());

        let (student_id, teacher_id, attendance) = match &out.person {
            Person::Student(s) => {
                let views = out
                    .day_events
                    .into_iter()
                    .map(|event| DayEventView {
                        event,
                        student_id: s.student_id.clone(),
                        name: s.name.clone(),
                        class: s.class.clone(),
                    })
                    .collect();
                (Some(s.student_id.clone()), None, Some(views))
            }
            Person::Teacher(t) => (None, Some(t.teacher_id.clone()), None),
        };

        CheckinResponse {
            message,
            person_type: out.person.kind(),
            student_id,
            teacher_id,
            name: out.person.name().to_string(),
            class: out.person.class().map(str::to_string),
            date: ev.date,
            check_in_type: ev.check_in_type,
            check_in_time: ev.time,
            status: ev.status,
            minutes_late: ev.minutes_late,
            attendance,
        }
    }
}

pub async fn checkin(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CheckinRequest>,
) -> AppResult<impl IntoResponse> {
    let code = body.qr_data.trim().to_string();
    if code.is_empty() {
        return Err(AppError::Validation("qr_data is required".into()));
    }

    // Client-supplied clock values are validated before the store is touched.
    let client_date = match body.client_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(d) => Some(parse_date(d)?),
    };
    let client_time = match body.client_time.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(t) => Some(parse_scan_time(t)?),
    };

    let opts = state.tracker_options();
    let outcome = state
        .pool
        .write(move |conn| tracker::check_in(conn, &code, client_date, client_time, opts, "api"))
        .await?;

    Ok(ok(CheckinResponse::from(outcome)))
}

// ---------------------------
// Stats / entries / report
// ---------------------------

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub date: NaiveDate,
    pub academic_year_id: Option<i64>,
    #[serde(flatten)]
    pub stats: DayStats,
    pub total: i64,
    pub entries: Vec<EntryRow>,
}

pub async fn stats(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let date = q.date()?;
    let basis = q.total_basis()?;

    let body = state
        .pool
        .read(move |conn| {
            let scope = resolve_scope(conn, q.academic_year_id.as_deref())?;
            let stats = aggregate::day_stats(conn, date, scope)?;
            let entries = aggregate::day_entries(conn, date, scope)?;
            Ok(StatsResponse {
                date,
                academic_year_id: scope_id(scope),
                total: stats.total(basis),
                stats,
                entries,
            })
        })
        .await?;

    Ok(ok(body))
}

#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub date: NaiveDate,
    pub entries: Vec<EntryRow>,
}

pub async fn entries(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let date = q.date()?;

    let body = state
        .pool
        .read(move |conn| {
            let scope = resolve_scope(conn, q.academic_year_id.as_deref())?;
            Ok(EntriesResponse {
                date,
                entries: aggregate::day_entries(conn, date, scope)?,
            })
        })
        .await?;

    Ok(ok(body))
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub date: NaiveDate,
    pub academic_year_id: Option<i64>,
    #[serde(flatten)]
    pub stats: DayStats,
    pub total: i64,
    pub entries: Vec<ReportEntry>,
    #[serde(rename = "absentStudents")]
    pub absent_students: Vec<AbsentStudent>,
}

pub async fn report(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let date = q.date()?;
    let basis = q.total_basis()?;

    let body = state
        .pool
        .read(move |conn| {
            let scope = resolve_scope(conn, q.academic_year_id.as_deref())?;
            let report = aggregate::day_report(conn, date, scope)?;
            Ok(ReportResponse {
                date,
                academic_year_id: scope_id(scope),
                total: report.stats.total(basis),
                stats: report.stats,
                entries: report.entries,
                absent_students: report.absent_students,
            })
        })
        .await?;

    Ok(ok(body))
}

/// Day report as a file download.
pub async fn export(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> AppResult<Response> {
    let date = q.date()?;
    let format = match q.format.as_deref() {
        None | Some("") => ExportFormat::Csv,
        Some(f) => ExportFormat::parse(f)?,
    };

    let bytes = state
        .pool
        .read(move |conn| {
            let scope = resolve_scope(conn, q.academic_year_id.as_deref())?;
            let report = aggregate::day_report(conn, date, scope)?;
            ExportLogic::render_report(&report, format)
        })
        .await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        ExportLogic::file_name(date, format)
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

// ---------------------------
// Bulk delete
// ---------------------------

#[derive(Debug, Deserialize)]
pub struct PurgeQuery {
    pub academic_year_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub message: String,
    pub deleted: usize,
}

pub async fn delete_all(
    State(state): State<AppState>,
    Query(q): Query<PurgeQuery>,
) -> AppResult<impl IntoResponse> {
    let deleted = state
        .pool
        .write(move |conn| {
            let scope = resolve_scope(conn, q.academic_year_id.as_deref())?;
            purge::purge(conn, scope)
        })
        .await?;

    Ok(ok(PurgeResponse {
        message: format!("Deleted {deleted} attendance record(s)"),
        deleted,
    }))
}
