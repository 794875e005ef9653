use crate::backend::Backend;
use crate::cli::commands::open_pool;
use crate::config::Config;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use chrono::{Local, TimeZone};

/// Backend, database and session details. Does not touch the log store.
pub async fn handle(cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let backend = Backend::build(cfg, pool.clone())?;
    let session = backend.identity.current_session().await;

    println!("{}• Backend:{} {}", CYAN, RESET, backend.kind.as_str());
    println!("{}• Database:{} {}{}{}", CYAN, RESET, YELLOW, cfg.database, RESET);

    match session {
        Some(s) => {
            println!("{}• Signed in as:{} {}{}{}", CYAN, RESET, GREEN, s.display_user(), RESET);
            let expiry = match s.expires_at.and_then(|ts| Local.timestamp_opt(ts, 0).single()) {
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => "never".to_string(),
            };
            println!("{}• Session expires:{} {}", CYAN, RESET, expiry);
        }
        None => {
            println!("{}• Signed in as:{} {}not signed in{}", CYAN, RESET, GREY, RESET);
        }
    }

    Ok(())
}
