use crate::core::controller::{DashboardState, DashboardView};
use crate::ui::chart::ChartRenderer;
use crate::utils::colors::{CYAN, GREY, RED, RESET};
use crate::utils::formatting::bold;

/// Where the command hints printed under each view point to.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// One-shot `pacer <command>` invocations.
    Cli,
    /// The `pacer dashboard` prompt.
    Interactive,
}

pub fn render(state: &DashboardState, chart: &dyn ChartRenderer, surface: Surface) -> String {
    let mut out = String::new();

    match state.view() {
        DashboardView::Unauthenticated => {
            out.push_str(&bold("Sign In to Pacer"));
            out.push('\n');
            match surface {
                Surface::Cli => {
                    hint(&mut out, "pacer login --email <email>", "Sign In");
                    hint(&mut out, "pacer signup --email <email>", "Sign Up");
                }
                Surface::Interactive => {
                    hint(&mut out, "login <email> <password>", "Sign In");
                    hint(&mut out, "signup <email> <password>", "Sign Up");
                }
            }
        }
        DashboardView::Loading => {
            out.push_str("Loading database...\n");
        }
        DashboardView::Ready => {
            if let Some(session) = &state.session {
                out.push_str(&format!(
                    "{GREY}Signed in as {}{RESET}\n\n",
                    session.display_user()
                ));
            }
            out.push_str(&chart.render(&state.chart));
            out.push('\n');
            out.push_str(&bold("Log Study Hours"));
            out.push('\n');
            match surface {
                Surface::Cli => {
                    hint(&mut out, "pacer add --date <YYYY-MM-DD> --hours <h>", "Save Entry");
                    hint(&mut out, "pacer logout", "Sign Out");
                }
                Surface::Interactive => {
                    hint(&mut out, "add <YYYY-MM-DD> <hours>", "Save Entry");
                    hint(&mut out, "signout", "Sign Out");
                }
            }
        }
    }

    if let Some(err) = &state.last_error {
        out.push_str(&format!("\n{RED}Last error: {}{RESET}\n", err));
    }

    out
}

fn hint(out: &mut String, command: &str, action: &str) {
    out.push_str(&format!("  {CYAN}{:<44}{RESET} {}\n", command, action));
}
