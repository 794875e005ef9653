use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::{migrate_config_file, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::path::Path;
use std::process::Command;

fn require_file(path: &Path) -> AppResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "{} not found: run `pacer init` first",
            path.display()
        )))
    }
}

fn check(path: &Path) -> AppResult<()> {
    require_file(path)?;
    let missing = missing_keys(path)?;
    if missing.is_empty() {
        success(format!("Configuration is complete: {}", path.display()));
    } else {
        warning(format!(
            "Missing fields in {}: {} (run `pacer config --migrate`)",
            path.display(),
            missing.join(", ")
        ));
    }
    Ok(())
}

fn default_editor() -> String {
    std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| if cfg!(windows) { "notepad" } else { "nano" }.to_string())
}

fn run_editor(editor: &str, path: &Path) -> bool {
    Command::new(editor)
        .arg(path)
        .status()
        .is_ok_and(|s| s.success())
}

/// `--editor` first, then $EDITOR / $VISUAL / the platform default.
fn edit(path: &Path, requested: Option<&str>) -> AppResult<()> {
    let fallback = default_editor();
    let first = requested.unwrap_or(&fallback);

    if run_editor(first, path) {
        success(format!("Configuration file edited using '{first}'"));
        return Ok(());
    }
    if first == fallback {
        return Err(AppError::Config(format!("failed to run editor '{first}'")));
    }

    warning(format!("Editor '{first}' not available, falling back to '{fallback}'"));
    if run_editor(&fallback, path) {
        success(format!("Configuration file edited using fallback '{fallback}'"));
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "failed to edit configuration file using fallback '{fallback}'"
        )))
    }
}

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Config {
        print_config,
        check: do_check,
        migrate,
        edit_config,
        editor,
    } = cmd
    else {
        return Ok(());
    };

    let path = Config::config_file();

    if *print_config {
        println!("📄 Current configuration:\n");
        println!("{}", cfg.to_yaml()?);
    }
    if *do_check {
        check(&path)?;
    }
    if *migrate {
        require_file(&path)?;
        migrate_config_file(&path)?;
    }
    if *edit_config {
        edit(&path, editor.as_deref())?;
    }
    Ok(())
}
