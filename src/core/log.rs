use crate::errors::AppResult;
use crate::utils::table::strip_ansi;
use ansi_term::Colour;
use rusqlite::Connection;

/// One row of the `log` table.
#[derive(Debug, Clone)]
pub struct LogRow {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

/// ANSI colour for an audit operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "checkin" => Colour::Green,
        "register" | "class_add" | "year_add" => Colour::Cyan,
        "edit" | "class_edit" | "year_edit" | "settings" => Colour::Yellow,
        "del" | "class_del" | "year_del" | "purge" => Colour::Red,
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Rows in insertion order; `limit` keeps only the most recent ones.
    pub fn fetch(conn: &Connection, limit: Option<usize>) -> AppResult<Vec<LogRow>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, date, operation, COALESCE(target, ''), message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogRow {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get(3)?,
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }

        if let Some(n) = limit
            && entries.len() > n
        {
            entries.drain(..entries.len() - n);
        }
        Ok(entries)
    }

    pub fn print_log(conn: &Connection, limit: Option<usize>) -> AppResult<()> {
        let entries = Self::fetch(conn, limit)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_target = |e: &LogRow| {
            if e.target.is_empty() {
                e.operation.clone()
            } else {
                format!("{} ({})", e.operation, e.target)
            }
        };

        // column width is capped at 60 visible characters
        let op_w = entries
            .iter()
            .map(|e| op_target(e).chars().count())
            .max()
            .unwrap_or(10)
            .min(60);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for e in &entries {
            let color = color_for_operation(&e.operation);

            let visible = op_target(e);
            let visible = if visible.chars().count() > 60 {
                let mut s: String = visible.chars().take(57).collect();
                s.push_str("...");
                s
            } else {
                visible
            };

            // only the operation word is coloured
            let colored = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                colored,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
