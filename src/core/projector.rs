//! Pace projection: turns the ordered study log into the two burndown series.

use crate::models::{LogEntry, ProjectionPoint};

/// Nominal amount of work remaining before the first entry.
pub const STARTING_REMAINING: f64 = 100.0;

/// Ideal-pace decrement applied once per logged entry.
pub const IDEAL_STEP: f64 = 3.5;

/// Project an ascending-by-date log into chart points.
///
/// - one point per entry, same order (no skipping, merging or dedup of dates)
/// - `ideal_remaining` drops by [`IDEAL_STEP`] per entry
/// - `actual_remaining` drops by the entry's `hours_spent`
/// - values are post-decrement, plain f64, never clamped (may go negative)
///
/// Sorting is the caller's job: stores return rows already ordered by date.
pub fn project(entries: &[LogEntry]) -> Vec<ProjectionPoint> {
    let mut ideal = STARTING_REMAINING;
    let mut actual = STARTING_REMAINING;

    entries
        .iter()
        .map(|entry| {
            ideal -= IDEAL_STEP;
            actual -= entry.hours_spent;
            ProjectionPoint {
                date: entry.date,
                ideal_remaining: ideal,
                actual_remaining: actual,
            }
        })
        .collect()
}
