//! Formatting utilities used for CLI and export outputs.

use crate::models::status::AttendanceStatus;
use crate::utils::colors::{GREEN, GREY, RED, YELLOW};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// "17 min" for late arrivals, empty otherwise.
pub fn minutes_late_label(mins: Option<i64>) -> String {
    match mins {
        Some(m) if m > 0 => format!("{m} min"),
        _ => String::new(),
    }
}

/// Label and ANSI colour for an attendance status; `None` means absent.
pub fn describe_status(status: Option<AttendanceStatus>) -> (&'static str, &'static str) {
    match status {
        Some(AttendanceStatus::Present) => ("present", GREEN),
        Some(AttendanceStatus::Late) => ("late", YELLOW),
        None => ("absent", RED),
    }
}

/// Same as `describe_status` but for rows that only departed, or teachers.
pub fn describe_status_or_dash(status: Option<AttendanceStatus>) -> (&'static str, &'static str) {
    match status {
        Some(_) => describe_status(status),
        None => ("-", GREY),
    }
}
