use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats::print_db_info;
use crate::errors::AppResult;
use crate::ui::messages::{error, header, success};

fn migrate(pool: &DbPool) -> AppResult<()> {
    header("Running migrations…");
    let pending = pending_migrations(&pool.conn)?;
    run_pending_migrations(&pool.conn)?;

    match pending.len() {
        0 => success("Schema already up to date."),
        n => success(format!("Migration completed ({n} applied).")),
    }
    Ok(())
}

fn integrity_check(pool: &DbPool) -> AppResult<()> {
    header("Running integrity check…");
    let verdict: String = pool
        .conn
        .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

    if verdict == "ok" {
        success("Integrity check passed.");
    } else {
        error(format!("Integrity check failed: {verdict}"));
    }
    ttlog_quiet(&pool.conn, "db_check", "", &verdict);
    Ok(())
}

fn vacuum(pool: &DbPool) -> AppResult<()> {
    header("Running VACUUM…");
    pool.conn.execute_batch("VACUUM;")?;
    success("Vacuum completed.");
    ttlog_quiet(&pool.conn, "db_vacuum", "", "Database compacted");
    Ok(())
}

/// `pacer db`: flags run in a fixed order (migrate, info, check, vacuum)
/// over a single connection.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate: do_migrate,
        check,
        vacuum: do_vacuum,
        info,
    } = cmd
    else {
        return Ok(());
    };

    if !(*do_migrate || *check || *do_vacuum || *info) {
        return Ok(());
    }
    let pool = DbPool::new(&cfg.database)?;

    if *do_migrate {
        migrate(&pool)?;
    }
    if *info {
        print_db_info(&pool, &cfg.database)?;
    }
    if *check {
        integrity_check(&pool)?;
    }
    if *do_vacuum {
        vacuum(&pool)?;
    }
    Ok(())
}
