// src/export/range.rs

use crate::errors::{AppError, AppResult};
use crate::utils::date::generate_from_period;
use chrono::NaiveDate;

/// Parse `--range` into inclusive bounds.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let (start_raw, end_raw) = match r.split_once(':') {
        Some((s, e)) => (s.trim(), e.trim()),
        None => (r.trim(), r.trim()),
    };

    if start_raw.len() != end_raw.len() {
        return Err(AppError::InvalidDate(
            "range start and end must have the same format".into(),
        ));
    }

    let first = generate_from_period(start_raw)?.first().copied();
    let last = generate_from_period(end_raw)?.last().copied();

    match (first, last) {
        (Some(d1), Some(d2)) if d1 <= d2 => Ok((d1, d2)),
        (Some(_), Some(_)) => Err(AppError::InvalidDate(format!(
            "range start {start_raw} is after range end {end_raw}"
        ))),
        _ => Err(AppError::InvalidDate(format!("unsupported range: {r}"))),
    }
}
