use crate::cli::parser::Commands;
use crate::config::{ClockSource, Config};
use crate::core::tracker::{self, TrackerOptions};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{field, success};
use crate::utils::date::parse_date;
use crate::utils::formatting::{describe_status_or_dash, minutes_late_label};
use crate::utils::{colors::paint, time::parse_scan_time};

/// Handle `scan <code> [--date] [--time]`.
///
/// The operator's `--date`/`--time` are always honoured; without them the
/// local clock is used.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan { code, date, time } = cmd {
        let date = date.as_deref().map(parse_date).transpose()?;
        let time = time.as_deref().map(parse_scan_time).transpose()?;

        let opts = TrackerOptions {
            clock: ClockSource::Client,
            duplicate_window_secs: cfg.duplicate_window_secs,
        };

        let mut pool = DbPool::new(&cfg.database)?;
        let outcome =
            pool.with_conn(|conn| tracker::check_in(conn, code, date, time, opts, "cli"))?;

        let ev = &outcome.event;
        success(format!(
            "{} recorded for {} ({})",
            ev.check_in_type.label(),
            outcome.person.name(),
            outcome.person.code()
        ));
        field("Type", outcome.person.kind().to_db_str());
        if let Some(class) = outcome.person.class() {
            field("Class", class);
        }
        field("Date", ev.date_str());
        field("Time", ev.time_str());

        if ev.is_arrival() {
            let (label, color) = describe_status_or_dash(ev.status);
            field("Status", paint(label, color));
            let late = minutes_late_label(ev.minutes_late);
            if !late.is_empty() {
                field("Minutes late", late);
            }
        }
    }

    Ok(())
}
