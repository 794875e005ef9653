// src/export/model.rs

use crate::models::ProjectionPoint;
use crate::utils::formatting::fmt_hours;
use serde::Serialize;

/// Flat row shared by every export format.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PointExport {
    pub date: String,
    pub ideal_remaining: f64,
    pub actual_remaining: f64,
}

impl From<&ProjectionPoint> for PointExport {
    fn from(p: &ProjectionPoint) -> Self {
        Self {
            date: p.date_str(),
            ideal_remaining: p.ideal_remaining,
            actual_remaining: p.actual_remaining,
        }
    }
}

/// Header per CSV / XLSX / PDF
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec!["date", "ideal_remaining", "actual_remaining"]
}

pub(crate) fn point_to_row(p: &PointExport) -> Vec<String> {
    vec![
        p.date.clone(),
        fmt_hours(p.ideal_remaining),
        fmt_hours(p.actual_remaining),
    ]
}

pub(crate) fn points_to_table(points: &[PointExport]) -> Vec<Vec<String>> {
    points.iter().map(point_to_row).collect()
}
