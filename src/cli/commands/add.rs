use crate::cli::commands::{open_pool, start_controller};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::controller::{DashboardView, SubmitOutcome};
use crate::db::log::ttlog_quiet;
use crate::errors::{AppError, AppResult};
use crate::ui::chart::TerminalChart;
use crate::ui::dashboard::{Surface, render};
use crate::ui::messages::success;

/// Log study hours through the dashboard form, then show the refreshed chart.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add { date, hours } = cmd {
        let pool = open_pool(cfg)?;
        let (mut controller, view) = start_controller(cfg, &pool).await?;

        if view == DashboardView::Unauthenticated {
            return Err(AppError::NotAuthenticated);
        }

        let outcome = controller.submit_form(date, hours).await;
        let state = controller.state();

        match outcome {
            SubmitOutcome::Saved => {
                ttlog_quiet(
                    &pool.conn,
                    "add",
                    date.trim(),
                    &format!("Logged {} hours", hours.trim()),
                );
                success(format!("Saved {} hours on {}", hours.trim(), date.trim()));
                println!();
                print!(
                    "{}",
                    render(state, &TerminalChart::new(cfg.chart_height), Surface::Cli)
                );

                // inserted, but the refresh failed
                if let Some(err) = &state.last_error {
                    return Err(AppError::Store(err.to_string()));
                }
            }
            SubmitOutcome::Invalid(v) => return Err(AppError::Validation(v.to_string())),
            SubmitOutcome::NotSignedIn => return Err(AppError::NotAuthenticated),
            SubmitOutcome::Failed(e) => {
                ttlog_quiet(&pool.conn, "insert_failed", date.trim(), &e.to_string());
                return Err(AppError::Store(e.to_string()));
            }
        }

        controller.shutdown();
    }

    Ok(())
}
