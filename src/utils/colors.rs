/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

/// Gap between actual and ideal pace:
/// actual below ideal (ahead of plan) → green
/// actual above ideal (behind plan) → red
/// on pace → reset
pub fn color_for_pace(ideal: f64, actual: f64) -> &'static str {
    if actual < ideal {
        GREEN
    } else if actual > ideal {
        RED
    } else {
        RESET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pace_colors() {
        assert_eq!(color_for_pace(90.0, 80.0), GREEN);
        assert_eq!(color_for_pace(90.0, 95.0), RED);
        assert_eq!(color_for_pace(90.0, 90.0), RESET);
    }
}
