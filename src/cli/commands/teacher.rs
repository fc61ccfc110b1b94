use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::registry;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::person::NewTeacher;
use crate::ui::messages::{field, header, info, success};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Teacher {
        list,
        add,
        id_card,
        phone,
        sex,
        del,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        if let Some(name) = add {
            let input = NewTeacher {
                name: name.clone(),
                id_card_number: id_card.clone().unwrap_or_default(),
                phone: phone.clone().unwrap_or_default(),
                sex: sex.clone().unwrap_or_default(),
                photo: None,
            };

            let t = pool.with_conn(|conn| registry::create_teacher(conn, &cfg.code_prefix, input))?;
            success(format!("Teacher {} registered.", t.name));
            field("ID", t.id);
            field("Code", &t.teacher_id);
        }

        if let Some(id) = del {
            let t = pool.with_conn(|conn| registry::delete_teacher(conn, *id))?;
            success(format!("Teacher {} ({}) deleted.", t.name, t.teacher_id));
        }

        if *list {
            let teachers = registry::list_teachers(&pool.conn)?;
            header("Teachers");

            if teachers.is_empty() {
                info("No teachers registered.");
                return Ok(());
            }

            let mut table = Table::new(["ID", "Code", "Name", "ID card", "Phone", "Sex"]);
            for t in &teachers {
                table.add_row(vec![
                    t.id.to_string(),
                    t.teacher_id.clone(),
                    t.name.clone(),
                    t.id_card_number.clone(),
                    t.phone.clone(),
                    t.sex.clone(),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
