use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::academic_year;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::academic_year::NewAcademicYear;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{GREEN, GREY, paint};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Year {
        list,
        add,
        start,
        end,
        activate,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        if let (Some(name), Some(start_year), Some(end_year)) = (add, start, end) {
            let input = NewAcademicYear {
                name: name.clone(),
                start_year: *start_year,
                end_year: *end_year,
                status: None,
            };
            let year = pool.with_conn(|conn| academic_year::create(conn, input))?;
            success(format!("Academic year {} created with id {}.", year.name, year.id));
        }

        if let Some(id) = activate {
            let year = pool.with_conn(|conn| academic_year::activate(conn, *id))?;
            success(format!("Academic year {} is now active.", year.name));
        }

        if *list {
            let years = academic_year::list(&pool.conn)?;
            header("Academic years");

            if years.is_empty() {
                info("No academic years defined.");
                return Ok(());
            }

            let mut table = Table::new(["ID", "Name", "Start", "End", "Status"]);
            for y in &years {
                let color = if y.is_active() { GREEN } else { GREY };
                table.add_row(vec![
                    y.id.to_string(),
                    y.name.clone(),
                    y.start_year.to_string(),
                    y.end_year.to_string(),
                    paint(y.status.to_db_str(), color),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
