use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use std::fs;

/// Snapshot of what the local database holds.
#[derive(Debug, Default, PartialEq)]
pub struct DbStats {
    pub entries: i64,
    pub accounts: i64,
    pub session_backend: Option<String>,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
    pub total_hours: f64,
}

impl DbStats {
    /// Hours per calendar day between the first and last logged day, both included.
    pub fn average_per_day(&self) -> Option<f64> {
        let (first, last) = (self.first_day?, self.last_day?);
        let days = (last - first).num_days() + 1;
        Some(self.total_hours / days as f64)
    }
}

fn to_day(raw: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    raw.map(|s| {
        NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
    })
    .transpose()
}

pub fn collect_stats(conn: &Connection) -> rusqlite::Result<DbStats> {
    let (entries, first, last, total_hours): (i64, Option<String>, Option<String>, f64) = conn
        .query_row(
            "SELECT COUNT(*), MIN(log_date), MAX(log_date), IFNULL(SUM(hours_spent), 0)
             FROM daily_logs",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )?;

    let accounts: i64 = conn.query_row("SELECT COUNT(*) FROM local_users", [], |r| r.get(0))?;

    let session_backend: Option<String> = conn
        .query_row("SELECT backend FROM auth_session WHERE id = 1", [], |r| {
            r.get(0)
        })
        .optional()?;

    Ok(DbStats {
        entries,
        accounts,
        session_backend,
        first_day: to_day(first)?,
        last_day: to_day(last)?,
        total_hours,
    })
}

fn or_dashes(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string())
        .unwrap_or_else(|| format!("{GREY}--{RESET}"))
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> rusqlite::Result<()> {
    let stats = collect_stats(&pool.conn)?;

    let size_mb = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0) as f64 / (1024.0 * 1024.0);

    println!();
    println!("{CYAN}• File:{RESET} {YELLOW}{db_path}{RESET}");
    println!("{CYAN}• Size:{RESET} {size_mb:.2} MB");
    println!("{CYAN}• Local log entries:{RESET} {GREEN}{}{RESET}", stats.entries);
    println!("{CYAN}• Local accounts:{RESET} {}", stats.accounts);
    println!(
        "{CYAN}• Stored session:{RESET} {}",
        stats
            .session_backend
            .clone()
            .unwrap_or_else(|| format!("{GREY}none{RESET}"))
    );
    println!("{CYAN}• Date range:{RESET}");
    println!("    from: {}", or_dashes(stats.first_day));
    println!("    to:   {}", or_dashes(stats.last_day));
    println!("{CYAN}• Total hours:{RESET} {:.2}", stats.total_hours);
    if let Some(avg) = stats.average_per_day() {
        println!("{CYAN}• Average hours/day:{RESET} {avg:.2}");
    }
    println!();

    Ok(())
}
