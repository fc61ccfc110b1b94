// src/export/logic.rs

use crate::core::aggregate::day_report;
use crate::db::attendance::dates_with_events;
use crate::errors::{AppError, AppResult};
use crate::export::json_csv::{render_csv, render_json};
use crate::export::model::{ReportExport, rows_from_report};
use crate::export::pdf_export::render_pdf;
use crate::export::range::parse_range;
use crate::export::xlsx::render_xlsx;
use crate::export::{ExportFormat, notify_export_success};
use crate::models::academic_year::YearScope;
use crate::models::report::DayReport;
use crate::ui::messages::{confirm, info, warning};
use crate::utils::path::expand_tilde;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

/// What to export: one day, or every day with events inside a range.
#[derive(Debug, Clone, Copy)]
pub enum ExportPeriod {
    Day(NaiveDate),
    Range(NaiveDate, NaiveDate),
}

impl ExportPeriod {
    /// `None` or a single date → one day; anything else goes through `parse_range`.
    pub fn parse(range: Option<&str>, today: NaiveDate) -> AppResult<Self> {
        match range {
            None => Ok(ExportPeriod::Day(today)),
            Some(r) => {
                let (from, to) = parse_range(r)?;
                if from == to {
                    Ok(ExportPeriod::Day(from))
                } else {
                    Ok(ExportPeriod::Range(from, to))
                }
            }
        }
    }
}

/// An existing target is only replaced with `--force` or the user's consent.
fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if force || !path.exists() {
        return Ok(());
    }
    if confirm(format!("The file '{}' already exists and will be overwritten.", path.display()))? {
        return Ok(());
    }
    Err(AppError::Export(
        "Export cancelled: existing file not overwritten".into(),
    ))
}

/// High level export entry points, shared by the CLI and the HTTP download.
pub struct ExportLogic;

impl ExportLogic {
    /// `attendance-report-<date>.<ext>`
    pub fn file_name(date: NaiveDate, format: ExportFormat) -> String {
        format!(
            "attendance-report-{}.{}",
            date.format("%Y-%m-%d"),
            format.as_str()
        )
    }

    pub fn render_rows(
        rows: &[ReportExport],
        format: ExportFormat,
        title: &str,
        summary: &str,
    ) -> AppResult<Vec<u8>> {
        match format {
            ExportFormat::Csv => render_csv(rows),
            ExportFormat::Json => render_json(rows),
            ExportFormat::Xlsx => render_xlsx(rows, title),
            ExportFormat::Pdf => render_pdf(rows, title, summary),
        }
    }

    /// Render a single day report, absent students included.
    pub fn render_report(report: &DayReport, format: ExportFormat) -> AppResult<Vec<u8>> {
        let rows = rows_from_report(report);
        let title = format!("Attendance report {}", report.date.format("%Y-%m-%d"));
        let s = &report.stats;
        let summary = format!(
            "Present: {}   Late: {}   Absent: {}   Roster: {}   Teachers: {}",
            s.present, s.late, s.absent, s.total_roster, s.teachers_checked_in
        );
        Self::render_rows(&rows, format, &title, &summary)
    }

    /// Write the report(s) of `period` to `file`.
    ///
    /// Returns the written path, or `None` when a range contained no events.
    pub fn export(
        conn: &Connection,
        format: ExportFormat,
        file: &str,
        period: ExportPeriod,
        scope: YearScope,
        force: bool,
    ) -> AppResult<Option<PathBuf>> {
        let path = expand_tilde(file);
        ensure_writable(&path, force)?;

        let bytes = match period {
            ExportPeriod::Day(date) => {
                let report = day_report(conn, date, scope)?;
                Self::render_report(&report, format)?
            }
            ExportPeriod::Range(from, to) => {
                let dates = dates_with_events(conn, from, to)?;
                if dates.is_empty() {
                    warning(format!("No attendance found between {from} and {to}."));
                    return Ok(None);
                }

                let mut rows = Vec::new();
                for d in &dates {
                    rows.extend(rows_from_report(&day_report(conn, *d, scope)?));
                }

                let title = format!("Attendance report {from} to {to}");
                let summary = format!("{} day(s) with attendance", dates.len());
                Self::render_rows(&rows, format, &title, &summary)?
            }
        };

        info(format!(
            "Exporting to {}: {}",
            format.as_str().to_uppercase(),
            path.display()
        ));

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;

        notify_export_success(&format.as_str().to_uppercase(), &path);
        Ok(Some(path))
    }
}
