use crate::backend::BackendKind;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for Pacer
/// Study-hours pace dashboard: ideal vs actual hours left to the target
#[derive(Parser)]
#[command(
    name = "pacer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track daily study hours and compare your pace against the ideal target burn-down",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the configured backend
    #[arg(global = true, long = "backend", value_enum)]
    pub backend: Option<BackendKind>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create an account and sign in
    Signup {
        #[arg(long, env = "PACER_EMAIL")]
        email: Option<String>,

        #[arg(long, env = "PACER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign in with email and password
    Login {
        #[arg(long, env = "PACER_EMAIL")]
        email: Option<String>,

        #[arg(long, env = "PACER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show backend and session details
    Status,

    /// Log study hours for a day
    Add {
        /// Day of study (YYYY-MM-DD, or `today` / `yesterday`)
        #[arg(long, default_value = "")]
        date: String,

        /// Hours spent (non-negative, decimals allowed)
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        hours: String,
    },

    /// Show the pace chart
    Chart,

    /// List logged days
    List {
        /// Filter: YYYY, YYYY-MM, YYYY-MM-DD or A:B intervals of the same form
        #[arg(long)]
        range: Option<String>,
    },

    /// Export the projected pace series
    Export {
        #[arg(long, value_enum)]
        format: ExportFormat,

        /// Absolute path of the output file
        #[arg(long)]
        file: String,

        /// Filter the exported points (see `list --range`)
        #[arg(long)]
        range: Option<String>,

        /// Overwrite an existing file without asking
        #[arg(short = 'f', long = "force")]
        force: bool,
    },

    /// Interactive dashboard: chart, form and session in one loop
    Dashboard,
}
