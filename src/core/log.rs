use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::formatting::strip_ansi;
use ansi_term::Colour;

const OP_TARGET_MAX: usize = 60;

/// Colour of an operation name in the internal log listing
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "insert_failed" | "fetch_failed" | "signin_failed" => Colour::Red,
        "login" | "signup" => Colour::Cyan,
        "logout" => Colour::Yellow,
        "session_refresh" | "export" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51), // arancione
        other if other.starts_with("db_") => Colour::Purple,
        _ => Colour::White,
    }
}

struct LogRow {
    id: i64,
    date: String,
    operation: String,
    op_target: String,
    message: String,
}

fn load_rows(pool: &DbPool) -> AppResult<Vec<LogRow>> {
    let mut stmt = pool
        .conn
        .prepare_cached("SELECT id, date, operation, target, message FROM log ORDER BY id ASC")?;

    let rows = stmt.query_map([], |row| {
        let id: i64 = row.get(0)?;
        let raw_date: String = row.get(1)?;
        let operation: String = row.get(2)?;
        let target: Option<String> = row.get(3)?;
        let message: String = row.get(4)?;

        let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
            .map(|dt| dt.format("%FT%T%:z").to_string())
            .unwrap_or(raw_date);

        let target = target.unwrap_or_default();
        let op_target = if target.is_empty() {
            operation.clone()
        } else {
            format!("{operation} ({target})")
        };

        Ok(LogRow {
            id,
            date,
            operation,
            op_target,
            message,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// `op (target)` with only the operation coloured, cut to 60 visible chars.
fn format_op_target(row: &LogRow) -> String {
    let color = color_for_operation(&row.operation);

    let visible = if row.op_target.chars().count() > OP_TARGET_MAX {
        let mut s: String = row.op_target.chars().take(OP_TARGET_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        row.op_target.clone()
    };

    match visible.split_once(' ') {
        Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_rows(pool)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| e.op_target.chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_TARGET_MAX);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for e in &entries {
            let colored = format_op_target(e);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::log::ttlog;

    #[test]
    fn rows_come_back_in_insertion_order() {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        ttlog(&pool.conn, "login", "me@example.com", "Signed in").unwrap();
        ttlog(&pool.conn, "add", "2024-01-01", "2 hours").unwrap();

        let rows = load_rows(&pool).unwrap();
        let ops: Vec<&str> = rows
            .iter()
            .filter(|r| r.operation != "migration_applied")
            .map(|r| r.op_target.as_str())
            .collect();
        assert_eq!(ops, vec!["login (me@example.com)", "add (2024-01-01)"]);
    }

    #[test]
    fn long_targets_are_truncated() {
        let row = LogRow {
            id: 1,
            date: String::new(),
            operation: "export".into(),
            op_target: format!("export ({})", "x".repeat(80)),
            message: String::new(),
        };
        let visible = strip_ansi(&format_op_target(&row));
        assert_eq!(visible.chars().count(), OP_TARGET_MAX);
        assert!(visible.ends_with("..."));
    }
}
