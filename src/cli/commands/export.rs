use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::academic_year::resolve_scope;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::export::logic::ExportPeriod;
use crate::utils::date::today;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        year,
        force,
    } = cmd
    {
        let period = ExportPeriod::parse(range.as_deref(), today())?;
        let pool = DbPool::new(&cfg.database)?;
        let scope = resolve_scope(&pool.conn, year.as_deref())?;

        ExportLogic::export(&pool.conn, *format, file, period, scope, *force)?;
    }
    Ok(())
}
