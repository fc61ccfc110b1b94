use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{academic_year::resolve_scope, purge};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::academic_year::YearScope;
use crate::ui::messages::{confirm, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Purge { year, yes } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;
        let scope = resolve_scope(&pool.conn, year.as_deref())?;

        let what = match scope {
            YearScope::All => "ALL attendance records".to_string(),
            YearScope::Year(id) => format!("the attendance records of academic year {id}"),
        };

        if !*yes && !confirm(format!("This will permanently delete {what}."))? {
            warning("Purge cancelled.");
            return Ok(());
        }

        let deleted = pool.with_conn(|conn| purge::purge(conn, scope))?;
        success(format!("Deleted {deleted} attendance record(s)."));
    }

    Ok(())
}
