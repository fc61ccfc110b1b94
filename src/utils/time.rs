//! Time utilities: strict HH:MM / HH:MM:SS parsing and server clock access.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, Timelike};

/// True when `t` is exactly two digits, a colon, two digits (optionally `:SS`).
fn has_clock_shape(t: &str, with_seconds: bool) -> bool {
    let b = t.as_bytes();
    let digits = |idx: &[usize]| idx.iter().all(|&i| b[i].is_ascii_digit());
    match b.len() {
        5 => b[2] == b':' && digits(&[0, 1, 3, 4]),
        8 if with_seconds => b[2] == b':' && b[5] == b':' && digits(&[0, 1, 3, 4, 6, 7]),
        _ => false,
    }
}

/// Parse a 24h `HH:MM` setting value.
pub fn parse_hhmm(t: &str) -> AppResult<NaiveTime> {
    let t = t.trim();
    if !has_clock_shape(t, false) {
        return Err(AppError::InvalidTime(t.to_string()));
    }
    NaiveTime::parse_from_str(t, "%H:%M").map_err(|_| AppError::InvalidTime(t.to_string()))
}

/// Parse a scan time, `HH:MM:SS` or `HH:MM` (seconds default to 0).
pub fn parse_scan_time(t: &str) -> AppResult<NaiveTime> {
    let t = t.trim();
    if !has_clock_shape(t, true) {
        return Err(AppError::InvalidTime(t.to_string()));
    }
    let fmt = if t.len() == 5 { "%H:%M" } else { "%H:%M:%S" };
    NaiveTime::parse_from_str(t, fmt).map_err(|_| AppError::InvalidTime(t.to_string()))
}

/// Server wall clock truncated to whole seconds.
pub fn now_time() -> NaiveTime {
    let now = chrono::Local::now().time();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M:%S").to_string()
}

pub fn format_optional_time(t: Option<NaiveTime>) -> String {
    t.map(format_time).unwrap_or_else(|| "--:--".to_string())
}
