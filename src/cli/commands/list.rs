use crate::backend::Backend;
use crate::cli::commands::open_pool;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::export::range::parse_optional_range;
use crate::models::LogEntry;
use crate::utils::colors::{CYAN, GREY, RESET};
use crate::utils::fmt_hours;
use crate::utils::table::{Column, Table};

/// Raw rows as returned by the log store, oldest first.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { range } = cmd {
        let bounds = parse_optional_range(range.as_deref())?;

        let pool = open_pool(cfg)?;
        let backend = Backend::build(cfg, pool.clone())?;
        let session = backend
            .identity
            .current_session()
            .await
            .ok_or(AppError::NotAuthenticated)?;

        let entries: Vec<LogEntry> = backend
            .store
            .fetch_logs(&session)
            .await?
            .into_iter()
            .filter(|e| bounds.is_none_or(|(from, to)| e.date >= from && e.date <= to))
            .collect();

        if entries.is_empty() {
            println!("{}No logged days.{}", GREY, RESET);
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("Date", 10),
            Column::right("Hours", 7),
            Column::right("Total", 8),
        ]);

        let mut total = 0.0;
        for e in &entries {
            total += e.hours_spent;
            table.add_row(vec![e.date_str(), fmt_hours(e.hours_spent), fmt_hours(total)]);
        }

        print!("{}", table.render());
        println!(
            "\n{}• Days:{} {}   {}• Hours:{} {}",
            CYAN,
            RESET,
            entries.len(),
            CYAN,
            RESET,
            fmt_hours(total)
        );
    }

    Ok(())
}
