//! Terminal rendering of the two pace series.

use crate::models::ProjectionPoint;
use crate::utils::colors::{BLUE, BOLD, GREY, RESET, color_for_pace};
use crate::utils::formatting::{fmt_hours, pad_left, pad_right};

pub const CHART_TITLE: &str = "Velocity: Target Completion";
pub const IDEAL_LABEL: &str = "Ideal Pace";
pub const ACTUAL_LABEL: &str = "Actual Pace";

const IDEAL_MARK: char = '·';
const ACTUAL_MARK: char = '●';
const COL_WIDTH: usize = 3;
const AXIS_WIDTH: usize = 7;

/// Anything able to turn a projection into printable text.
pub trait ChartRenderer {
    fn render(&self, points: &[ProjectionPoint]) -> String;
}

/// `Ideal Pace: 96.5 hrs left`
pub fn tooltip_line(label: &str, value: f64) -> String {
    format!("{}: {} hrs left", label, fmt_hours(value))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Ideal,
    Actual,
}

pub struct TerminalChart {
    height: usize,
    color: bool,
}

impl TerminalChart {
    pub fn new(height: usize) -> Self {
        Self {
            height: height.max(3),
            color: true,
        }
    }

    /// Same layout without ANSI sequences.
    pub fn plain(height: usize) -> Self {
        Self {
            color: false,
            ..Self::new(height)
        }
    }

    fn paint(&self, color: &str, s: &str) -> String {
        if self.color {
            format!("{color}{s}{RESET}")
        } else {
            s.to_string()
        }
    }

    fn plot(&self, points: &[ProjectionPoint], out: &mut String) {
        let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            lo = lo.min(p.ideal_remaining).min(p.actual_remaining);
            hi = hi.max(p.ideal_remaining).max(p.actual_remaining);
        }
        let span = if hi > lo { hi - lo } else { 1.0 };
        let rows = self.height;

        let row_of = |v: f64| -> usize {
            let r = ((hi - v) / span * (rows - 1) as f64).round();
            (r.max(0.0) as usize).min(rows - 1)
        };

        let mut grid = vec![vec![Cell::Empty; points.len()]; rows];
        for (i, p) in points.iter().enumerate() {
            grid[row_of(p.ideal_remaining)][i] = Cell::Ideal;
        }
        // actual drawn last: wins on overlap
        for (i, p) in points.iter().enumerate() {
            grid[row_of(p.actual_remaining)][i] = Cell::Actual;
        }

        for (r, line) in grid.iter().enumerate() {
            let label = if r == 0 || r == rows - 1 || r == rows / 2 {
                let v = hi - span * r as f64 / (rows - 1) as f64;
                fmt_hours((v * 10.0).round() / 10.0)
            } else {
                String::new()
            };

            out.push_str(&pad_left(&label, AXIS_WIDTH));
            out.push_str(" │");
            for cell in line {
                let glyph = match cell {
                    Cell::Empty => " ".to_string(),
                    Cell::Ideal => self.paint(GREY, &IDEAL_MARK.to_string()),
                    Cell::Actual => self.paint(BLUE, &ACTUAL_MARK.to_string()),
                };
                out.push(' ');
                out.push_str(&glyph);
                out.push(' ');
            }
            out.push('\n');
        }

        out.push_str(&" ".repeat(AXIS_WIDTH + 1));
        out.push('└');
        out.push_str(&"─".repeat(points.len() * COL_WIDTH));
        out.push('\n');

        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            let first_label = first.date.format("%m-%d").to_string();
            let mut axis = format!("{}{}", " ".repeat(AXIS_WIDTH + 2), first_label);
            if points.len() > 1 {
                let last_label = last.date.format("%m-%d").to_string();
                let total = AXIS_WIDTH + 2 + points.len() * COL_WIDTH;
                let room = total.saturating_sub(axis.len() + last_label.len());
                axis.push_str(&" ".repeat(room.max(1)));
                axis.push_str(&last_label);
            }
            out.push_str(&axis);
            out.push('\n');
        }
    }
}

impl ChartRenderer for TerminalChart {
    fn render(&self, points: &[ProjectionPoint]) -> String {
        let mut out = String::new();

        out.push_str(&self.paint(BOLD, CHART_TITLE));
        out.push_str("\n\n");

        if points.is_empty() {
            out.push_str("  No study hours logged yet.\n");
            return out;
        }

        self.plot(points, &mut out);

        out.push('\n');
        out.push_str(&format!(
            "  {} {}   {} {}\n\n",
            self.paint(GREY, &IDEAL_MARK.to_string()),
            IDEAL_LABEL,
            self.paint(BLUE, &ACTUAL_MARK.to_string()),
            ACTUAL_LABEL
        ));

        for p in points {
            let ideal = tooltip_line(IDEAL_LABEL, p.ideal_remaining);
            let actual = tooltip_line(ACTUAL_LABEL, p.actual_remaining);
            let actual = if self.color {
                let c = color_for_pace(p.ideal_remaining, p.actual_remaining);
                format!("{c}{actual}{RESET}")
            } else {
                actual
            };
            out.push_str(&format!(
                "  {}  {}  {}\n",
                p.date_str(),
                pad_right(&ideal, 28),
                actual
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(day: u32, ideal: f64, actual: f64) -> ProjectionPoint {
        ProjectionPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            ideal_remaining: ideal,
            actual_remaining: actual,
        }
    }

    #[test]
    fn empty_projection_renders_title_only() {
        let out = TerminalChart::plain(10).render(&[]);
        assert!(out.starts_with(CHART_TITLE));
        assert!(out.contains("No study hours logged yet."));
    }

    #[test]
    fn tooltips_use_shortest_hours() {
        let out = TerminalChart::plain(10).render(&[point(1, 96.5, 98.0), point(2, 93.0, -20.0)]);

        assert!(out.contains("2024-01-01  Ideal Pace: 96.5 hrs left"));
        assert!(out.contains("Actual Pace: 98 hrs left"));
        assert!(out.contains("Ideal Pace: 93 hrs left"));
        assert!(out.contains("Actual Pace: -20 hrs left"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn one_marker_column_per_point() {
        let pts = [point(1, 96.5, 96.5), point(2, 93.0, 90.0), point(3, 89.5, 80.0)];
        let out = TerminalChart::plain(8).render(&pts);

        let plot_rows: Vec<&str> = out.lines().filter(|l| l.contains('│')).collect();
        assert_eq!(plot_rows.len(), 8);

        let actual = out.matches(ACTUAL_MARK).count();
        let ideal = out.matches(IDEAL_MARK).count();
        // one legend glyph each; point 1 overlaps so only the actual mark shows
        assert_eq!(actual, 3 + 1);
        assert_eq!(ideal, 2 + 1);
        assert!(out.contains("01-01"));
        assert!(out.contains("01-03"));
    }

    #[test]
    fn flat_series_does_not_divide_by_zero() {
        let out = TerminalChart::plain(5).render(&[point(1, 50.0, 50.0)]);
        assert!(out.contains("Ideal Pace: 50 hrs left"));
    }
}
