use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{academic_year::resolve_scope, aggregate};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::report::EntryRow;
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_in_out, paint};
use crate::utils::date::parse_date_or_today;
use crate::utils::formatting::{describe_status_or_dash, minutes_late_label};
use crate::utils::table::Table;
use crate::utils::time::format_time;

/// Handle `list [--date] [--year]`: the day's events, newest first.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { date, year } = cmd {
        let date = parse_date_or_today(date.as_deref())?;
        let pool = DbPool::new(&cfg.database)?;

        let scope = resolve_scope(&pool.conn, year.as_deref())?;
        let rows = aggregate::day_entries(&pool.conn, date, scope)?;

        header(format!("Attendance events {}", date.format("%Y-%m-%d")));

        if rows.is_empty() {
            info(format!("No attendance recorded on {}.", date.format("%Y-%m-%d")));
            return Ok(());
        }

        print!("{}", entries_table(&rows).render());
        println!("\n{} event(s)", rows.len());
    }

    Ok(())
}

fn entries_table(rows: &[EntryRow]) -> Table {
    let mut table = Table::new(["Time", "Type", "Code", "Name", "Class", "Status", "Late"]);

    for r in rows {
        let (label, color) = describe_status_or_dash(r.status);
        table.add_row(vec![
            colorize_in_out(&format_time(r.check_in_time), r.check_in_type.is_arrival()),
            r.check_in_type.to_db_str().to_string(),
            r.code().to_string(),
            r.name.clone(),
            r.class.clone().unwrap_or_else(|| "-".into()),
            paint(label, color),
            minutes_late_label(r.minutes_late),
        ]);
    }

    table
}
