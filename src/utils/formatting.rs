//! Formatting utilities used for CLI and export outputs.

use regex::Regex;
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Pad to `width` terminal columns (unicode aware, ANSI sequences not counted).
pub fn pad_right(s: &str, width: usize) -> String {
    let visible = UnicodeWidthStr::width(strip_ansi(s).as_str());
    format!("{}{}", s, " ".repeat(width.saturating_sub(visible)))
}

pub fn pad_left(s: &str, width: usize) -> String {
    let visible = UnicodeWidthStr::width(strip_ansi(s).as_str());
    format!("{}{}", " ".repeat(width.saturating_sub(visible)), s)
}

/// Remove ANSI colour sequences.
pub fn strip_ansi(s: &str) -> String {
    static ANSI: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI regex"));
    ANSI.replace_all(s, "").into_owned()
}

/// Hours in shortest form: `96.5`, `93`, `-20`.
pub fn fmt_hours(v: f64) -> String {
    // -0 would otherwise print as "-0"
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{}", v)
}
