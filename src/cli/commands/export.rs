use crate::cli::commands::{open_pool, start_controller};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::controller::DashboardView;
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::export::ExportLogic;

/// Export the projected series currently shown on the chart.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        force,
    } = cmd
    {
        let pool = open_pool(cfg)?;
        let (controller, view) = start_controller(cfg, &pool).await?;

        match view {
            DashboardView::Unauthenticated => return Err(AppError::NotAuthenticated),
            DashboardView::Loading => {
                let msg = controller
                    .state()
                    .last_error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "log store unavailable".into());
                ttlog_quiet(&pool.conn, "fetch_failed", "", &msg);
                return Err(AppError::Store(msg));
            }
            DashboardView::Ready => {}
        }

        let exported = ExportLogic::export(
            &controller.state().chart,
            *format,
            file,
            range.as_deref(),
            *force,
        )?;

        if exported > 0 {
            ttlog_quiet(
                &pool.conn,
                "export",
                file,
                &format!("{} points as {}", exported, format.as_str()),
            );
        }

        controller.shutdown();
    }

    Ok(())
}
