//! `signup`, `login`, `logout`: the sign-in surface of the one-shot CLI.

use crate::auth::SignUpOutcome;
use crate::cli::commands::{open_pool, read_credentials, start_controller};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::controller::{DashboardController, DashboardView};
use crate::db::log::ttlog_quiet;
use crate::errors::AppResult;
use crate::ui::chart::TerminalChart;
use crate::ui::dashboard::{Surface, render};
use crate::ui::messages::{info, success};

fn show_dashboard(controller: &DashboardController, cfg: &Config) {
    println!();
    print!(
        "{}",
        render(
            controller.state(),
            &TerminalChart::new(cfg.chart_height),
            Surface::Cli
        )
    );
}

pub async fn signup(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Signup { email, password } = cmd {
        let credentials = read_credentials(email, password)?;
        let pool = open_pool(cfg)?;
        let (mut controller, _) = start_controller(cfg, &pool).await?;

        match controller.sign_up(&credentials).await? {
            SignUpOutcome::SignedIn(session) => {
                success(format!("Account created. Signed in as {}", session.display_user()));
                show_dashboard(&controller, cfg);
            }
            SignUpOutcome::ConfirmationRequired { email } => {
                info(format!(
                    "Check {} for the confirmation link, then run `pacer login`.",
                    email
                ));
            }
        }

        controller.shutdown();
    }

    Ok(())
}

pub async fn login(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Login { email, password } = cmd {
        let credentials = read_credentials(email, password)?;
        let pool = open_pool(cfg)?;
        let (mut controller, _) = start_controller(cfg, &pool).await?;

        if let Err(e) = controller.sign_in(&credentials).await {
            ttlog_quiet(&pool.conn, "signin_failed", &credentials.email, &e.to_string());
            return Err(e);
        }

        if let Some(session) = &controller.state().session {
            success(format!("Signed in as {}", session.display_user()));
        }
        show_dashboard(&controller, cfg);
        controller.shutdown();
    }

    Ok(())
}

pub async fn logout(cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let (mut controller, view) = start_controller(cfg, &pool).await?;

    if view == DashboardView::Unauthenticated {
        info("Not signed in.");
        return Ok(());
    }

    controller.sign_out().await?;
    success("Signed out.");
    controller.shutdown();

    Ok(())
}
