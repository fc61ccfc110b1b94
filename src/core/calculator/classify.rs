use crate::models::status::AttendanceStatus;
use chrono::NaiveTime;

/// Outcome of classifying an arrival against the school start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: AttendanceStatus,
    pub minutes_late: i64,
}

/// `arrival <= start` is present with 0 minutes late. Anything later is late,
/// with the whole minutes elapsed since start (08:00:30 → late, 0 minutes).
pub fn classify(arrival: NaiveTime, school_start: NaiveTime) -> Classification {
    if arrival <= school_start {
        return Classification {
            status: AttendanceStatus::Present,
            minutes_late: 0,
        };
    }

    let minutes_late = (arrival - school_start).num_seconds() / 60;

    Classification {
        status: AttendanceStatus::Late,
        minutes_late,
    }
}
