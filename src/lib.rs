//! Pacer library root.
//! Exposes the CLI parser, the high-level run() function and the internal modules.

pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Signup { .. } => commands::auth::signup(&cli.command, cfg).await,
        Commands::Login { .. } => commands::auth::login(&cli.command, cfg).await,
        Commands::Logout => commands::auth::logout(cfg).await,
        Commands::Status => commands::status::handle(cfg).await,
        Commands::Add { .. } => commands::add::handle(&cli.command, cfg).await,
        Commands::Chart => commands::chart::handle(cfg).await,
        Commands::List { .. } => commands::list::handle(&cli.command, cfg).await,
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg).await,
        Commands::Dashboard => commands::dashboard::handle(cfg).await,
    }
}

/// Entry point usato da main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ carica config UNA sola volta
    let mut cfg = Config::load()?;

    // 3️⃣ override da riga di comando
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(kind) = cli.backend {
        cfg.backend = kind;
    }

    // 4️⃣ runtime single-thread: tutte le chiamate di rete passano di qui
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(dispatch(&cli, &cfg));

    // a pending stdin read must not keep the process alive
    runtime.shutdown_background();
    result
}
