use crate::cli::commands::{open_pool, start_controller};
use crate::config::Config;
use crate::core::controller::DashboardError;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::ui::chart::TerminalChart;
use crate::ui::dashboard::{Surface, render};

/// Print the dashboard as it stands after the startup session check.
pub async fn handle(cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let (controller, _) = start_controller(cfg, &pool).await?;

    print!(
        "{}",
        render(
            controller.state(),
            &TerminalChart::new(cfg.chart_height),
            Surface::Cli
        )
    );

    if let Some(DashboardError::Fetch(msg)) = &controller.state().last_error {
        ttlog_quiet(&pool.conn, "fetch_failed", "", msg);
        return Err(AppError::Store(msg.clone()));
    }

    controller.shutdown();
    Ok(())
}
