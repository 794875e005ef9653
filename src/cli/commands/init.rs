use crate::backend::BackendKind;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::ui::messages::warning;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database with all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.backend, cli.test)?;

    println!("⚙️  Initializing Pacer…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &cfg.database);
    println!("🔌 Backend    : {}", cfg.backend.as_str());

    let pool = open_db(&cfg.database)?;

    println!("✅ Database initialized at {}", &cfg.database);

    ttlog_quiet(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {} ({} backend)", &cfg.database, cfg.backend.as_str()),
    );

    if cfg.backend == BackendKind::Supabase
        && (cfg.supabase_url.is_empty() || cfg.supabase_key.is_empty())
    {
        warning(
            "Supabase URL / key not set: run `pacer config --edit` or export \
             PACER_SUPABASE_URL and PACER_SUPABASE_KEY",
        );
    }

    println!("🎉 Pacer initialization completed!");
    Ok(())
}
