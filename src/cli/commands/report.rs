use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{academic_year::resolve_scope, aggregate};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::academic_year::YearScope;
use crate::models::report::DayReport;
use crate::ui::messages::{field, header, info};
use crate::utils::colors::paint;
use crate::utils::date::parse_date_or_today;
use crate::utils::formatting::{bold, describe_status_or_dash, minutes_late_label};
use crate::utils::table::Table;
use crate::utils::time::format_optional_time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report { date, year } = cmd {
        let date = parse_date_or_today(date.as_deref())?;
        let pool = DbPool::new(&cfg.database)?;

        let scope = resolve_scope(&pool.conn, year.as_deref())?;
        let report = aggregate::day_report(&pool.conn, date, scope)?;

        print_report(&report, scope);
    }

    Ok(())
}

fn print_report(report: &DayReport, scope: YearScope) {
    let s = &report.stats;

    header(format!("Attendance report {}", report.date.format("%Y-%m-%d")));
    field(
        "Academic year",
        scope
            .year_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "all".into()),
    );
    field("Present", s.present);
    field("Late", s.late);
    field("Absent", s.absent);
    field("Checked in", s.total_checked_in);
    field("Roster", s.total_roster);
    field("Teachers", s.teachers_checked_in);
    println!();

    if report.entries.is_empty() {
        info("Nobody checked in.");
    } else {
        let mut table = Table::new(["Code", "Name", "Class", "Arrival", "Departure", "Status", "Late"]);
        for e in &report.entries {
            let (label, color) = describe_status_or_dash(e.status);
            table.add_row(vec![
                e.code().to_string(),
                e.name.clone(),
                e.class.clone().unwrap_or_else(|| "-".into()),
                format_optional_time(e.arrival),
                format_optional_time(e.departure),
                paint(label, color),
                minutes_late_label(e.minutes_late),
            ]);
        }
        print!("{}", table.render());
        println!();
    }

    if !report.absent_students.is_empty() {
        println!("{}", bold(&format!("Absent students ({})", report.absent_students.len())));
        let mut table = Table::new(["Code", "Name", "Class"]);
        for a in &report.absent_students {
            table.add_row(vec![a.student_id.clone(), a.name.clone(), a.class.clone()]);
        }
        print!("{}", table.render());
    }
}
