use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::settings;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{field, header, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Settings { start, end } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;

        let times = match (start, end) {
            (Some(s), Some(e)) => {
                let t = pool.with_conn(|conn| settings::set(conn, s, e))?;
                success("School times updated.");
                t
            }
            _ => settings::get(&pool.conn)?,
        };

        header("School times");
        field("Start", times.school_start_time.format("%H:%M"));
        field("End", times.school_end_time.format("%H:%M"));
    }

    Ok(())
}
