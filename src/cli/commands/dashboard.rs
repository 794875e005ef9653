//! `pacer dashboard`: a single-threaded event loop over stdin lines, session
//! changes and a periodic session check.

use crate::auth::{REFRESH_MARGIN_SECS, SignUpOutcome};
use crate::cli::commands::{open_pool, start_controller};
use crate::config::Config;
use crate::core::controller::{DashboardController, SubmitOutcome};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::Credentials;
use crate::ui::chart::TerminalChart;
use crate::ui::dashboard::{Surface, render};
use crate::ui::messages::{alert, error, info, success};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, interval_at};

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Add { date: String, hours: String },
    Login(Credentials),
    Signup(Credentials),
    SignOut,
    Refresh,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Input::Empty;
    };

    let mut arg = || words.next().unwrap_or("").to_string();

    match cmd.to_lowercase().as_str() {
        "add" | "a" => {
            let date = arg();
            let hours = arg();
            Input::Add { date, hours }
        }
        "login" | "signin" => {
            let email = arg();
            let password = arg();
            Input::Login(Credentials { email, password })
        }
        "signup" => {
            let email = arg();
            let password = arg();
            Input::Signup(Credentials { email, password })
        }
        "signout" | "logout" => Input::SignOut,
        "refresh" | "r" => Input::Refresh,
        "help" | "h" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  add <YYYY-MM-DD> <hours>    log study hours");
    println!("  login <email> <password>    sign in");
    println!("  signup <email> <password>   create an account");
    println!("  signout                     sign out");
    println!("  refresh                     reload the chart");
    println!("  help                        this list");
    println!("  quit                        leave the dashboard");
}

fn redraw(controller: &DashboardController, chart: &TerminalChart) {
    println!();
    print!("{}", render(controller.state(), chart, Surface::Interactive));
}

fn show_prompt() {
    print!("pacer> ");
    std::io::stdout().flush().ok();
}

/// Returns `false` when the loop should stop.
async fn handle_input(
    input: Input,
    controller: &mut DashboardController,
    pool: &DbPool,
    chart: &TerminalChart,
) -> bool {
    match input {
        Input::Empty => {}
        Input::Quit => return false,
        Input::Help => print_help(),
        Input::Unknown(cmd) => error(format!("Unknown command '{}': type `help`", cmd)),

        Input::Add { date, hours } => match controller.submit_form(&date, &hours).await {
            SubmitOutcome::Saved => {
                ttlog_quiet(&pool.conn, "add", &date, &format!("Logged {} hours", hours));
                redraw(controller, chart);
            }
            SubmitOutcome::Invalid(v) => alert(v),
            SubmitOutcome::NotSignedIn => alert("Sign in first: login <email> <password>"),
            SubmitOutcome::Failed(e) => {
                ttlog_quiet(&pool.conn, "insert_failed", &date, &e.to_string());
                error(e);
            }
        },

        Input::Login(credentials) => match controller.sign_in(&credentials).await {
            Ok(()) => redraw(controller, chart),
            Err(e) => {
                ttlog_quiet(&pool.conn, "signin_failed", &credentials.email, &e.to_string());
                error(e);
            }
        },

        Input::Signup(credentials) => match controller.sign_up(&credentials).await {
            Ok(SignUpOutcome::SignedIn(_)) => redraw(controller, chart),
            Ok(SignUpOutcome::ConfirmationRequired { email }) => {
                info(format!("Check {} for the confirmation link, then `login`.", email))
            }
            Err(e) => error(e),
        },

        Input::SignOut => match controller.sign_out().await {
            Ok(()) => {
                success("Signed out.");
                redraw(controller, chart);
            }
            Err(e) => error(e),
        },

        Input::Refresh => {
            controller.refresh().await;
            redraw(controller, chart);
        }
    }

    true
}

pub async fn handle(cfg: &Config) -> AppResult<()> {
    let pool = open_pool(cfg)?;
    let (mut controller, _) = start_controller(cfg, &pool).await?;
    let chart = TerminalChart::new(cfg.chart_height);

    redraw(&controller, &chart);
    println!("\nType `help` for the list of commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let period = Duration::from_secs(REFRESH_MARGIN_SECS as u64);
    let mut session_check = interval_at(Instant::now() + period, period);
    let mut listening = true;

    loop {
        show_prompt();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_input(parse_input(&line), &mut controller, &pool, &chart).await {
                    break;
                }
            }

            change = controller.next_session_change(), if listening => {
                match change {
                    Some(session) => {
                        controller.apply_session(session).await;
                        redraw(&controller, &chart);
                    }
                    None => listening = false,
                }
            }

            _ = session_check.tick() => {
                // refreshes a token close to expiry; the result arrives as a session change
                controller.identity().current_session().await;
            }
        }
    }

    println!();
    controller.shutdown();
    Ok(())
}
