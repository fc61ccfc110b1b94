use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.to_string()))
}

/// Parse an optional date, falling back to today when absent or blank.
pub fn parse_date_or_today(s: Option<&str>) -> AppResult<NaiveDate> {
    match s.map(str::trim) {
        None | Some("") => Ok(today()),
        Some(v) => parse_date(v),
    }
}

/// Expand `YYYY`, `YYYY-MM` or `YYYY-MM-DD` into the covered days.
pub fn generate_from_period(p: &str) -> AppResult<Vec<NaiveDate>> {
    let p = p.trim();

    // YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(p, "%Y-%m-%d") {
        return Ok(vec![d]);
    }

    // YYYY-MM
    if let Ok(dm) = NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d") {
        return Ok(all_days_of_month(dm.year(), dm.month()));
    }

    // YYYY
    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
    {
        return Ok(all_days_of_year(year));
    }

    Err(AppError::InvalidDate(format!("Invalid period: {p}")))
}

pub fn all_days_of_month(year: i32, month: u32) -> Vec<NaiveDate> {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => first.iter_days().take_while(|d| d.month() == month).collect(),
        None => Vec::new(),
    }
}

pub fn all_days_of_year(year: i32) -> Vec<NaiveDate> {
    match NaiveDate::from_ymd_opt(year, 1, 1) {
        Some(first) => first.iter_days().take_while(|d| d.year() == year).collect(),
        None => Vec::new(),
    }
}
