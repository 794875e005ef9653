// src/export/range.rs

use crate::errors::{AppError, AppResult};
use crate::models::ProjectionPoint;
use chrono::NaiveDate;

fn bad(msg: &str, input: &str) -> AppError {
    AppError::Validation(format!("Invalid --range '{input}': {msg}"))
}

/// Primo e ultimo giorno di un periodo `YYYY`, `YYYY-MM` o `YYYY-MM-DD`.
fn period_bounds(p: &str, input: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match p.len() {
        // YYYY
        4 => {
            let y: i32 = p.parse().map_err(|_| bad("invalid year", input))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| bad("invalid year", input))?;
            let d2 =
                NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| bad("invalid year", input))?;
            Ok((d1, d2))
        }
        // YYYY-MM
        7 if p.as_bytes()[4] == b'-' => {
            let y: i32 = p
                .get(0..4)
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| bad("invalid year", input))?;
            let m: u32 = p
                .get(5..7)
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| bad("invalid month", input))?;
            let last = month_last_day(y, m).ok_or_else(|| bad("invalid month", input))?;

            let d1 = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| bad("invalid month", input))?;
            let d2 =
                NaiveDate::from_ymd_opt(y, m, last).ok_or_else(|| bad("invalid month", input))?;
            Ok((d1, d2))
        }
        // YYYY-MM-DD
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d")
                .map_err(|_| bad("invalid date", input))?;
            Ok((d, d))
        }
        _ => Err(bad("unsupported format", input)),
    }
}

/// Parse --range.
///
/// Supporta:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let r = r.trim();

    match r.split_once(':') {
        Some((start_raw, end_raw)) => {
            let start = start_raw.trim();
            let end = end_raw.trim();

            if start.len() != end.len() {
                return Err(bad("start and end must have same format", r));
            }

            let (d1, _) = period_bounds(start, r)?;
            let (_, d2) = period_bounds(end, r)?;

            if d1 > d2 {
                return Err(bad("start is after end", r));
            }
            Ok((d1, d2))
        }
        None => period_bounds(r, r),
    }
}

/// `None` / `"all"` → nessun filtro.
pub fn parse_optional_range(range: Option<&str>) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    match range {
        None => Ok(None),
        Some(r) if r.trim().eq_ignore_ascii_case("all") => Ok(None),
        Some(r) => parse_range(r).map(Some),
    }
}

/// Keep the points inside `bounds`. Applied after projection, so every kept
/// point still carries its whole-history remaining values.
pub fn filter_points(
    points: &[ProjectionPoint],
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> Vec<ProjectionPoint> {
    match bounds {
        None => points.to_vec(),
        Some((from, to)) => points
            .iter()
            .filter(|p| p.date >= from && p.date <= to)
            .cloned()
            .collect(),
    }
}

fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => {
            let leap = (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0);
            Some(if leap { 29 } else { 28 })
        }
        _ => None,
    }
}
