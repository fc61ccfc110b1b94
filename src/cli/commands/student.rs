use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{academic_year::resolve_scope, registry};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::person::NewStudent;
use crate::ui::messages::{field, header, info, success};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Student {
        list,
        add,
        class,
        phone,
        year,
        del,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        if let Some(name) = add {
            let academic_year_id = match year.as_deref() {
                None => None,
                Some(raw) => Some(raw.trim().parse::<i64>().map_err(|_| {
                    AppError::Validation(format!("Invalid academic year id: {raw}"))
                })?),
            };
            let input = NewStudent {
                name: name.clone(),
                class: class.clone().unwrap_or_default(),
                parent_phone: phone.clone().unwrap_or_default(),
                photo: None,
                academic_year_id,
            };

            let s = pool.with_conn(|conn| registry::create_student(conn, &cfg.code_prefix, input))?;
            success(format!("Student {} registered.", s.name));
            field("ID", s.id);
            field("Code", &s.student_id);
            field("Class", &s.class);
        }

        if let Some(id) = del {
            let s = pool.with_conn(|conn| registry::delete_student(conn, *id))?;
            success(format!("Student {} ({}) deleted.", s.name, s.student_id));
        }

        if *list {
            let scope = resolve_scope(&pool.conn, year.as_deref())?;
            let students = registry::list_students(&pool.conn, scope)?;
            header("Students");

            if students.is_empty() {
                info("No students registered.");
                return Ok(());
            }

            let mut table = Table::new(["ID", "Code", "Name", "Class", "Parent phone", "Year"]);
            for s in &students {
                table.add_row(vec![
                    s.id.to_string(),
                    s.student_id.clone(),
                    s.name.clone(),
                    s.class.clone(),
                    s.parent_phone.clone(),
                    s.academic_year_id.map(|y| y.to_string()).unwrap_or_else(|| "-".into()),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
