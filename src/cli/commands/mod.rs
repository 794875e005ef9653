pub mod add;
pub mod auth;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod status;

use crate::backend::Backend;
use crate::config::Config;
use crate::core::controller::{DashboardController, DashboardView};
use crate::db::initialize::open_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::Credentials;
use crate::ui::messages::prompt;
use std::rc::Rc;

/// Open (and migrate) the database named in the configuration.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<Rc<DbPool>> {
    Ok(Rc::new(open_db(&cfg.database)?))
}

/// Build the controller for the configured backend and run its startup check.
pub(crate) async fn start_controller(
    cfg: &Config,
    pool: &Rc<DbPool>,
) -> AppResult<(DashboardController, DashboardView)> {
    let backend = Backend::build(cfg, pool.clone())?;
    let mut controller = DashboardController::from_backend(backend);
    let view = controller.start().await;
    Ok((controller, view))
}

/// Email / password from flags or env, otherwise asked on stdin.
pub(crate) fn read_credentials(
    email: &Option<String>,
    password: &Option<String>,
) -> AppResult<Credentials> {
    let email = match email {
        Some(e) if !e.trim().is_empty() => e.trim().to_string(),
        _ => prompt("Email")?.trim().to_string(),
    };
    let password = match password {
        Some(p) if !p.is_empty() => p.clone(),
        _ => prompt("Password")?,
    };

    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are both required".into(),
        ));
    }

    Ok(Credentials { email, password })
}
